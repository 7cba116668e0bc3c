//! Durable key-value slots backing the listing store.
//!
//! [`Storage`] is the browser-local-storage analogue: named slots holding
//! strings. Encoding is the caller's concern; implementations only move
//! text in and out.
//!
//! - [`MemoryStorage`] - process-local, clone-shared map (tests, previews)
//! - [`FileStorage`] - one JSON file per slot inside a data directory

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors raised by a [`Storage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the slot failed.
    #[error("storage I/O error for slot {key:?}: {source}")]
    Io {
        /// Slot name.
        key: String,
        #[source]
        source: io::Error,
    },

    /// The slot name cannot be mapped to a storage location.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value persistence.
pub trait Storage {
    /// Read the slot. `Ok(None)` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot with `value`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value could not be stored.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the slot. Removing a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// In-memory
// =============================================================================

/// In-memory storage backed by a `HashMap`.
///
/// Clone-friendly: clones share the same slots, so a test can hand one clone
/// to a store and inspect what was written through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage with one slot already written.
    #[must_use]
    pub fn with_slot(key: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.write() {
            slots.insert(key.to_owned(), value.to_owned());
        }
        storage
    }

    /// Make subsequent `save`/`remove` calls fail (simulates a full or
    /// read-only medium).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current raw value of a slot.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.slots.read().ok()?.get(key).cloned()
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".into()));
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| StorageError::Unavailable("lock poisoned".into()))?;
        Ok(slots.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".into()))?;
        slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut slots = self
            .slots
            .write()
            .map_err(|_| StorageError::Unavailable("lock poisoned".into()))?;
        slots.remove(key);
        Ok(())
    }
}

// =============================================================================
// File-backed
// =============================================================================

/// File-backed storage: slot `key` lives at `<dir>/<key>.json`.
///
/// The directory is created on first write. Writes go to a temporary
/// sibling and are renamed into place, so a slot is either the old or the
/// new content, never a torn write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. Nothing is touched on disk until a write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] for empty keys, keys containing
    /// path separators, or keys starting with `.`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = key.is_empty()
            || key.starts_with('.')
            || key.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
        if invalid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn io_error(key: &str, source: io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_owned(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(key, e))?;

        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        let write_tmp = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(Self::io_error(key, e));
        }

        fs::rename(&tmp_path, &path).map_err(|e| Self::io_error(key, e))?;
        tracing::trace!(path = %path.display(), bytes = value.len(), "Slot written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_save_and_load() {
        let mut storage = MemoryStorage::new();
        storage.save("slot", "value").unwrap();
        assert_eq!(storage.load("slot").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_memory_missing_slot_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_memory_clone_shares_slots() {
        let mut storage = MemoryStorage::new();
        let observer = storage.clone();
        storage.save("slot", "v1").unwrap();
        assert_eq!(observer.get("slot").as_deref(), Some("v1"));
    }

    #[test]
    fn test_memory_fail_writes() {
        let mut storage = MemoryStorage::with_slot("slot", "old");
        storage.set_fail_writes(true);
        assert!(matches!(
            storage.save("slot", "new"),
            Err(StorageError::Unavailable(_))
        ));
        assert_eq!(storage.get("slot").as_deref(), Some("old"));

        storage.set_fail_writes(false);
        storage.save("slot", "new").unwrap();
        assert_eq!(storage.get("slot").as_deref(), Some("new"));
    }

    #[test]
    fn test_memory_remove() {
        let mut storage = MemoryStorage::with_slot("slot", "value");
        storage.remove("slot").unwrap();
        storage.remove("slot").unwrap();
        assert!(storage.get("slot").is_none());
    }

    #[test]
    fn test_file_missing_dir_loads_none() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("not-yet-created"));
        assert!(storage.load("cars-store").unwrap().is_none());
    }

    #[test]
    fn test_file_save_creates_dir_and_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");
        let mut storage = FileStorage::new(&dir);

        storage.save("cars-store", r#"{"cars":[]}"#).unwrap();

        assert!(dir.join("cars-store.json").is_file());
        assert!(!dir.join(".cars-store.json.tmp").exists());
        assert_eq!(
            storage.load("cars-store").unwrap().as_deref(),
            Some(r#"{"cars":[]}"#)
        );
    }

    #[test]
    fn test_file_save_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path());
        storage.save("slot", "first").unwrap();
        storage.save("slot", "second").unwrap();
        assert_eq!(storage.load("slot").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_remove_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(tmp.path());
        storage.remove("slot").unwrap();
        storage.save("slot", "x").unwrap();
        storage.remove("slot").unwrap();
        assert!(storage.load("slot").unwrap().is_none());
    }

    #[test]
    fn test_file_rejects_bad_keys() {
        let storage = FileStorage::new("/tmp/unused");
        for key in ["", "../escape", "a/b", ".hidden", "a\\b"] {
            assert!(
                matches!(storage.slot_path(key), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }
}
