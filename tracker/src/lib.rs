//! Local persistence and application context for padelcoach.
//!
//! Sessions, analyses and matches are each kept as one most-recent-first
//! collection, rewritten in full on every append. [`Tracker`] owns the three
//! stores; [`config`] resolves where they live and how to reach the coaching
//! service.

pub mod app;
pub mod config;
pub mod persistence;

pub use app::{SlotKind, Tracker, TrackerError};
pub use persistence::{FileSlots, MemorySlots, PersistenceError, Record, RecordStore, SlotBackend};
