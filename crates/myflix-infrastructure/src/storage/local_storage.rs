//! `LocalStorage` implementations.

use super::atomic_json::AtomicJsonFile;
use myflix_core::StorageError;
use myflix_core::session::LocalStorage;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// File name of the key/value document inside the storage directory.
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";

type Entries = BTreeMap<String, String>;

/// Durable storage backed by one JSON document on disk.
///
/// Every write is a locked read-modify-write of the whole document followed
/// by fsync and atomic rename, so a process started right after a call
/// returns reads the new value.
pub struct FileLocalStorage {
    file: AtomicJsonFile<Entries>,
}

impl FileLocalStorage {
    /// Creates storage rooted at `dir` (created lazily on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicJsonFile::new(dir.into().join(LOCAL_STORAGE_FILE)),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

impl LocalStorage for FileLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.file.load()?.and_then(|mut entries| entries.remove(key)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.file.update(Entries::new(), |entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.file.update(Entries::new(), |entries| {
            entries.remove(key);
            Ok(())
        })
    }
}

/// Process-local storage for tests and `--ephemeral` runs.
#[derive(Debug, Default)]
pub struct MemoryLocalStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}
