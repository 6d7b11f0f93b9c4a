mod record_store;
mod slots;

pub use record_store::{decode, encode, DecodeError, Decoded, Record, RecordStore, SCHEMA_VERSION};
pub use slots::{FileSlots, MemorySlots, SlotBackend};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Slot '{slot}' was modified by another writer (expected revision {expected:?}, found {found:?})")]
    Conflict {
        slot: &'static str,
        expected: Option<u64>,
        found: Option<u64>,
    },
    #[error("Slot '{slot}' uses schema version {version}, which this build cannot write")]
    NewerSchema { slot: &'static str, version: u32 },
    #[error("Slot '{slot}' has reached the highest revision number and cannot be written")]
    RevisionExhausted { slot: &'static str },
}
