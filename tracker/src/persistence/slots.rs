//! Backing slots: one named blob of JSON text per store.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key-value storage for whole serialized collections.
pub trait SlotBackend: Clone {
    /// Contents of `slot`, or `None` if it was never written.
    fn read(&self, slot: &str) -> io::Result<Option<String>>;

    /// Replace the contents of `slot`.
    fn write(&self, slot: &str, contents: &str) -> io::Result<()>;
}

/// One `<slot>.json` file per slot in a data directory.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
}

impl FileSlots {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }
}

impl SlotBackend for FileSlots {
    fn read(&self, slot: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.file_path(slot)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, slot: &str, contents: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.file_path(slot);
        // Readers see either the old or the new file, never a torn one.
        let tmp = self.dir.join(format!("{}.json.tmp", slot));
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)
    }
}

/// In-process slots. Clones share the same map, so two stores opened on
/// clones behave like two processes sharing a data directory.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| io::Error::other("slot map poisoned"))
    }
}

impl SlotBackend for MemorySlots {
    fn read(&self, slot: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(slot).cloned())
    }

    fn write(&self, slot: &str, contents: &str) -> io::Result<()> {
        self.lock()?.insert(slot.to_string(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_slot_missing_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path().join("data"));
        assert_eq!(slots.read("padel_sessions").unwrap(), None);
    }

    #[test]
    fn test_file_slot_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::new(dir.path().join("data"));
        slots.write("padel_matches", "[]").unwrap();
        slots.write("padel_matches", "[1]").unwrap();
        assert_eq!(slots.read("padel_matches").unwrap().as_deref(), Some("[1]"));
        assert!(!dir.path().join("data/padel_matches.json.tmp").exists());
    }

    #[test]
    fn test_memory_slots_share_state_between_clones() {
        let a = MemorySlots::new();
        let b = a.clone();
        a.write("x", "1").unwrap();
        assert_eq!(b.read("x").unwrap().as_deref(), Some("1"));
    }
}
