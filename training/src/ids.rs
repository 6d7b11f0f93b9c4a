//! Identifier and date helpers shared by the forms.

use chrono::{Local, NaiveDate};

/// Random v4 UUID in hyphenated form. Uniqueness is not checked.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Today's calendar date in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
