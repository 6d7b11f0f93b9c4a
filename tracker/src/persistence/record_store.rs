use super::slots::SlotBackend;
use super::PersistenceError;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use training::{AnalysisHistory, Match, TrainingSession};

/// Schema version written into every envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Trait for record kinds that live in a RecordStore.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Backing slot name.
    const SLOT: &'static str;

    fn id(&self) -> &str;
}

impl Record for TrainingSession {
    const SLOT: &'static str = "padel_sessions";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AnalysisHistory {
    const SLOT: &'static str = "padel_analyses";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Match {
    const SLOT: &'static str = "padel_matches";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, R> {
    version: u32,
    revision: u64,
    records: &'a [R],
}

/// Header of the versioned envelope. Records stay raw until the version is
/// known to be readable.
#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    revision: u64,
    records: Value,
}

/// Decoded slot contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<R> {
    pub revision: u64,
    pub records: Vec<R>,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("schema version {0} is newer than supported version {max}", max = SCHEMA_VERSION)]
    UnsupportedVersion(u32),
}

/// Parse a slot's text: the versioned envelope, or the bare array written by
/// the browser build (legacy, revision 0). Errors keep serde's message, which
/// names the offending field or value.
pub fn decode<R: DeserializeOwned>(contents: &str) -> Result<Decoded<R>, DecodeError> {
    match serde_json::from_str::<Value>(contents)? {
        array @ Value::Array(_) => Ok(Decoded {
            revision: 0,
            records: serde_json::from_value(array)?,
        }),
        object @ Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(object)?;
            if envelope.version > SCHEMA_VERSION {
                return Err(DecodeError::UnsupportedVersion(envelope.version));
            }
            Ok(Decoded {
                revision: envelope.revision,
                records: serde_json::from_value(envelope.records)?,
            })
        }
        _ => Err(DecodeError::Json(serde::de::Error::custom(
            "expected a record array or a versioned envelope object",
        ))),
    }
}

pub fn encode<R: Serialize>(revision: u64, records: &[R]) -> serde_json::Result<String> {
    serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        revision,
        records,
    })
}

/// Revision of whatever is in the slot right now, without decoding records.
/// `None` when the slot is absent or unreadable.
fn probe_revision(contents: Option<&str>) -> Option<u64> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Probe {
        Envelope {
            #[serde(default)]
            revision: u64,
            #[allow(dead_code)]
            records: IgnoredAny,
        },
        Legacy(#[allow(dead_code)] Vec<IgnoredAny>),
    }

    match serde_json::from_str::<Probe>(contents?).ok()? {
        Probe::Envelope { revision, .. } => Some(revision),
        Probe::Legacy(_) => Some(0),
    }
}

/// Ordered, most-recent-first collection of one record kind, kept in lockstep
/// with its backing slot.
///
/// Assumes one writer per slot. A second writer is detected by comparing the
/// slot's revision with the one this store last saw; the check and the write
/// are not atomic, so two appends racing within that window can still lose
/// one of them.
#[derive(Debug)]
pub struct RecordStore<R, B> {
    backend: B,
    records: Vec<R>,
    /// Slot revision as of load or the last successful write.
    seen_revision: Option<u64>,
    /// Set when the slot was written by a newer schema; appends are refused.
    newer_schema: Option<u32>,
}

impl<R: Record, B: SlotBackend> RecordStore<R, B> {
    /// Read the slot. Absent, unreadable or unparsable data yields an empty
    /// store; the latter two are logged.
    pub fn load(backend: B) -> Self {
        let contents = match backend.read(R::SLOT) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(slot = R::SLOT, "Failed to read slot, starting empty: {}", e);
                None
            }
        };

        let mut newer_schema = None;
        let (records, seen_revision) = match contents.as_deref() {
            None => (Vec::new(), None),
            Some(text) => match decode::<R>(text) {
                Ok(decoded) => (decoded.records, Some(decoded.revision)),
                Err(DecodeError::UnsupportedVersion(version)) => {
                    tracing::warn!(
                        slot = R::SLOT,
                        version,
                        "Slot was written by a newer version; records are hidden and appends refused"
                    );
                    newer_schema = Some(version);
                    (Vec::new(), probe_revision(Some(text)))
                }
                Err(e) => {
                    tracing::warn!(
                        slot = R::SLOT,
                        "Stored data could not be parsed and is ignored: {}",
                        e
                    );
                    (Vec::new(), probe_revision(Some(text)))
                }
            },
        };

        tracing::debug!(slot = R::SLOT, count = records.len(), "Loaded records");
        Self {
            backend,
            records,
            seen_revision,
            newer_schema,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn revision(&self) -> Option<u64> {
        self.seen_revision
    }

    /// Put `record` at the head and persist the whole collection.
    ///
    /// Memory is only updated once the write succeeded, so on error the store
    /// still matches what it last saw on disk.
    pub fn append(&mut self, record: R) -> Result<&[R], PersistenceError> {
        self.replace_with(|records| {
            let mut next = Vec::with_capacity(records.len() + 1);
            next.push(record);
            next.extend_from_slice(records);
            next
        })?;
        tracing::info!(slot = R::SLOT, count = self.records.len(), "Appended record");
        Ok(&self.records)
    }

    /// Prepend every incoming record whose id is not stored yet, keeping the
    /// incoming order, in a single write. Returns how many were added.
    pub fn merge_missing(&mut self, incoming: Vec<R>) -> Result<usize, PersistenceError> {
        let mut missing: Vec<R> = Vec::new();
        for record in incoming {
            if !self.contains(record.id()) && !missing.iter().any(|m| m.id() == record.id()) {
                missing.push(record);
            }
        }
        if missing.is_empty() {
            return Ok(0);
        }

        let added = missing.len();
        self.replace_with(move |records| {
            missing.extend_from_slice(records);
            missing
        })?;
        tracing::info!(slot = R::SLOT, added, "Merged records");
        Ok(added)
    }

    fn replace_with<F>(&mut self, build: F) -> Result<(), PersistenceError>
    where
        F: FnOnce(&[R]) -> Vec<R>,
    {
        if let Some(version) = self.newer_schema {
            return Err(PersistenceError::NewerSchema {
                slot: R::SLOT,
                version,
            });
        }

        let on_disk = probe_revision(self.backend.read(R::SLOT)?.as_deref());
        if on_disk != self.seen_revision {
            tracing::warn!(
                slot = R::SLOT,
                expected = ?self.seen_revision,
                found = ?on_disk,
                "Slot changed since it was loaded"
            );
            return Err(PersistenceError::Conflict {
                slot: R::SLOT,
                expected: self.seen_revision,
                found: on_disk,
            });
        }

        let next = build(&self.records);
        let revision = self
            .seen_revision
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(PersistenceError::RevisionExhausted { slot: R::SLOT })?;
        let json = encode(revision, &next)?;
        if let Err(e) = self.backend.write(R::SLOT, &json) {
            tracing::error!(slot = R::SLOT, "Failed to persist records: {}", e);
            return Err(e.into());
        }

        self.records = next;
        self.seen_revision = Some(revision);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{FileSlots, MemorySlots};
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::io;
    use training::{Intensity, MatchResult, SetScore, ShotType};

    fn session(id: &str) -> TrainingSession {
        TrainingSession {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            shots: vec![ShotType::Bandeja, ShotType::Volley],
            duration: 75,
            intensity: Intensity::High,
            notes: Some("net play".to_string()),
        }
    }

    fn sample_match(id: &str) -> Match {
        Match {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 4, 11).unwrap(),
            result: MatchResult::Win,
            sets: vec![
                SetScore { mine: 6, opponent: 3 },
                SetScore { mine: 7, opponent: 5 },
            ],
            positive_shots: vec![ShotType::Smash],
            improvement_shots: vec![],
            notes: None,
        }
    }

    /// Reads succeed, writes always fail.
    #[derive(Clone, Default)]
    struct ReadOnlySlots(MemorySlots);

    impl SlotBackend for ReadOnlySlots {
        fn read(&self, slot: &str) -> io::Result<Option<String>> {
            self.0.read(slot)
        }

        fn write(&self, _slot: &str, _contents: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn test_append_to_empty_store() {
        let mut store = RecordStore::<TrainingSession, _>::load(MemorySlots::new());
        assert!(store.is_empty());

        let records = store.append(session("a")).unwrap();
        assert_eq!(records, &[session("a")]);
    }

    #[test]
    fn test_append_prepends_and_keeps_order() {
        let mut store = RecordStore::<TrainingSession, _>::load(MemorySlots::new());
        store.append(session("a")).unwrap();
        store.append(session("b")).unwrap();
        let before = store.records().to_vec();

        let after = store.append(session("c")).unwrap().to_vec();
        let mut expected = vec![session("c")];
        expected.extend(before);
        assert_eq!(after, expected);
    }

    #[test]
    fn test_persisted_collection_reloads_equal() {
        let slots = MemorySlots::new();
        for n in [0usize, 1, 4] {
            let mut store = RecordStore::<Match, _>::load(MemorySlots::new());
            for i in 0..n {
                store.append(sample_match(&format!("m{i}"))).unwrap();
            }
            let json = encode(store.revision().unwrap_or(0), store.records()).unwrap();
            slots.write(Match::SLOT, &json).unwrap();

            let reloaded = RecordStore::<Match, _>::load(slots.clone());
            assert_eq!(reloaded.records(), store.records());
        }
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path().to_path_buf());
        let mut store = RecordStore::<TrainingSession, _>::load(slots.clone());
        store.append(session("a")).unwrap();
        store.append(session("b")).unwrap();

        let reopened = RecordStore::<TrainingSession, _>::load(slots);
        assert_eq!(reopened.records(), store.records());
        assert_eq!(reopened.revision(), Some(2));
    }

    #[test]
    fn test_missing_slot_loads_empty() {
        let store = RecordStore::<AnalysisHistory, _>::load(MemorySlots::new());
        assert!(store.is_empty());
        assert_eq!(store.revision(), None);
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let slots = MemorySlots::new();
        slots.write(TrainingSession::SLOT, "not json {").unwrap();
        let mut store = RecordStore::<TrainingSession, _>::load(slots.clone());
        assert!(store.is_empty());

        // The unreadable value is overwritten by the next append.
        store.append(session("a")).unwrap();
        let reloaded = RecordStore::<TrainingSession, _>::load(slots);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_legacy_array_is_read_and_upgraded() {
        let slots = MemorySlots::new();
        let legacy = serde_json::to_string(&vec![session("old")]).unwrap();
        slots.write(TrainingSession::SLOT, &legacy).unwrap();

        let mut store = RecordStore::<TrainingSession, _>::load(slots.clone());
        assert_eq!(store.records(), &[session("old")]);
        assert_eq!(store.revision(), Some(0));

        store.append(session("new")).unwrap();
        let raw = slots.read(TrainingSession::SLOT).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["revision"], 1);
        assert_eq!(value["records"][1]["id"], "old");
    }

    #[test]
    fn test_newer_schema_version_is_not_misread() {
        let slots = MemorySlots::new();
        slots
            .write(Match::SLOT, r#"{"version":99,"revision":4,"records":[]}"#)
            .unwrap();
        let mut store = RecordStore::<Match, _>::load(slots.clone());
        assert!(store.is_empty());
        assert_eq!(store.revision(), Some(4));

        let err = store.append(sample_match("m1")).unwrap_err();
        assert!(matches!(err, PersistenceError::NewerSchema { version: 99, .. }));
        let raw = slots.read(Match::SLOT).unwrap().unwrap();
        assert!(raw.contains("\"version\":99"));
    }

    #[test]
    fn test_second_writer_is_detected() {
        let slots = MemorySlots::new();
        let mut first = RecordStore::<TrainingSession, _>::load(slots.clone());
        let mut second = RecordStore::<TrainingSession, _>::load(slots.clone());

        first.append(session("a")).unwrap();
        let err = second.append(session("b")).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Conflict {
                expected: None,
                found: Some(1),
                ..
            }
        ));
        assert!(second.is_empty());

        let reloaded = RecordStore::<TrainingSession, _>::load(slots);
        assert_eq!(reloaded.records(), &[session("a")]);
    }

    #[test]
    fn test_failed_write_leaves_memory_untouched() {
        let mut store = RecordStore::<TrainingSession, _>::load(ReadOnlySlots::default());
        let err = store.append(session("a")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_decode_error_names_unknown_label() {
        let legacy = r#"[{"id":"a","date":"2024-04-10","shots":["Drop"],"duration":60,"intensity":"Media"}]"#;
        let err = decode::<TrainingSession>(legacy).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
        assert!(err.to_string().contains("Drop"), "{err}");
    }

    #[test]
    fn test_decode_error_names_missing_field_in_envelope() {
        let envelope = r#"{"version":1,"revision":2,"records":[{"id":"a","date":"2024-04-10","shots":[],"intensity":"Media"}]}"#;
        let err = decode::<TrainingSession>(envelope).unwrap_err();
        assert!(err.to_string().contains("duration"), "{err}");
    }

    #[test]
    fn test_decode_rejects_scalar_top_level() {
        assert!(matches!(
            decode::<Match>("42"),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_highest_revision_refuses_append() {
        let slots = MemorySlots::new();
        let full = format!(r#"{{"version":1,"revision":{},"records":[]}}"#, u64::MAX);
        slots.write(TrainingSession::SLOT, &full).unwrap();
        let mut store = RecordStore::<TrainingSession, _>::load(slots.clone());
        assert_eq!(store.revision(), Some(u64::MAX));

        let err = store.append(session("a")).unwrap_err();
        assert!(matches!(err, PersistenceError::RevisionExhausted { .. }));
        assert!(store.is_empty());
        assert_eq!(slots.read(TrainingSession::SLOT).unwrap(), Some(full));
    }

    #[test]
    fn test_merge_missing_skips_known_ids() {
        let mut store = RecordStore::<Match, _>::load(MemorySlots::new());
        store.append(sample_match("m1")).unwrap();

        let added = store
            .merge_missing(vec![
                sample_match("m3"),
                sample_match("m1"),
                sample_match("m2"),
                sample_match("m3"),
            ])
            .unwrap();
        assert_eq!(added, 2);
        let ids: Vec<_> = store.records().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m3", "m2", "m1"]);
        assert_eq!(store.merge_missing(vec![sample_match("m2")]).unwrap(), 0);
    }

    proptest! {
        #[test]
        fn prop_append_is_prepend(existing in prop::collection::vec("[a-z]{1,8}", 0..12)) {
            let mut store = RecordStore::<TrainingSession, _>::load(MemorySlots::new());
            for id in existing.iter().rev() {
                store.append(session(id)).unwrap();
            }
            let before = store.records().to_vec();

            let after = store.append(session("fresh")).unwrap();
            prop_assert_eq!(after.len(), before.len() + 1);
            prop_assert_eq!(&after[0], &session("fresh"));
            prop_assert_eq!(&after[1..], &before[..]);
        }
    }
}
