//! Input validation for new sessions and matches.
//!
//! A form either produces a complete record or a [`FormError`]; nothing is
//! persisted here.

use crate::ids::{new_record_id, today};
use crate::model::{Intensity, Match, MatchResult, SetScore, ShotType, TrainingSession};
use chrono::NaiveDate;

/// Most sets a match form accepts.
pub const MAX_SETS: usize = 5;

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Select at least one trained shot")]
    NoShotsSelected,
    #[error("Enter the score of at least one set")]
    NoSets,
    #[error("A match has at most {max} sets (got {0})", max = MAX_SETS)]
    TooManySets(usize),
    #[error("Set {set}: '{value}' is not a non-negative whole number")]
    InvalidSetScore { set: usize, value: String },
}

#[derive(Debug, Clone)]
pub struct SessionForm {
    pub date: NaiveDate,
    pub shots: Vec<ShotType>,
    pub duration: u32,
    pub intensity: Intensity,
    pub notes: String,
}

impl Default for SessionForm {
    fn default() -> Self {
        Self {
            date: today(),
            shots: Vec::new(),
            duration: DEFAULT_DURATION_MINUTES,
            intensity: Intensity::default(),
            notes: String::new(),
        }
    }
}

impl SessionForm {
    pub fn submit(self) -> Result<TrainingSession, FormError> {
        let shots = dedup_shots(self.shots);
        if shots.is_empty() {
            return Err(FormError::NoShotsSelected);
        }

        Ok(TrainingSession {
            id: new_record_id(),
            date: self.date,
            shots,
            duration: self.duration,
            intensity: self.intensity,
            notes: optional_notes(self.notes),
        })
    }
}

/// One row of the set-score inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetInput {
    pub mine: String,
    pub opponent: String,
}

impl SetInput {
    pub fn new(mine: impl Into<String>, opponent: impl Into<String>) -> Self {
        Self {
            mine: mine.into(),
            opponent: opponent.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.mine.trim().is_empty() && !self.opponent.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct MatchForm {
    pub date: NaiveDate,
    pub result: MatchResult,
    pub sets: Vec<SetInput>,
    pub positive_shots: Vec<ShotType>,
    pub improvement_shots: Vec<ShotType>,
    pub notes: String,
}

impl Default for MatchForm {
    fn default() -> Self {
        Self {
            date: today(),
            result: MatchResult::default(),
            sets: vec![SetInput::default()],
            positive_shots: Vec::new(),
            improvement_shots: Vec::new(),
            notes: String::new(),
        }
    }
}

impl MatchForm {
    pub fn submit(self) -> Result<Match, FormError> {
        if self.sets.len() > MAX_SETS {
            return Err(FormError::TooManySets(self.sets.len()));
        }

        // Rows with a blank side are dropped, not zero-filled.
        let mut sets = Vec::with_capacity(self.sets.len());
        for (index, row) in self.sets.iter().enumerate() {
            if !row.is_complete() {
                continue;
            }
            sets.push(SetScore {
                mine: parse_games(&row.mine, index + 1)?,
                opponent: parse_games(&row.opponent, index + 1)?,
            });
        }

        if sets.is_empty() {
            return Err(FormError::NoSets);
        }

        Ok(Match {
            id: new_record_id(),
            date: self.date,
            result: self.result,
            sets,
            positive_shots: dedup_shots(self.positive_shots),
            improvement_shots: dedup_shots(self.improvement_shots),
            notes: optional_notes(self.notes),
        })
    }
}

fn parse_games(value: &str, set: usize) -> Result<u32, FormError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| FormError::InvalidSetScore {
            set,
            value: value.to_string(),
        })
}

/// Keeps the first occurrence of each label.
fn dedup_shots(shots: Vec<ShotType>) -> Vec<ShotType> {
    let mut seen = Vec::with_capacity(shots.len());
    for shot in shots {
        if !seen.contains(&shot) {
            seen.push(shot);
        }
    }
    seen
}

fn optional_notes(notes: String) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
