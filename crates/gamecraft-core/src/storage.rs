//! Key-value storage backends for saved games.
//!
//! This module provides:
//! - KeyValueStore trait for storage abstraction
//! - MemoryStore for tests and throwaway sessions
//! - FileStore keeping one file per key under a directory

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Key contains characters that cannot name a file.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend not available.
    #[error("Storage backend not available: {0}")]
    Unavailable(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// String-valued key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Reads a value. `Ok(None)` if the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes a value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("memory store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "Memory"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Filesystem store: each key is a `<key>.json` file in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at a directory. The directory is created on
    /// first write.
    #[must_use]
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "File"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read {} bytes from {}", contents.len(), path.display());
                Ok(Some(contents))
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.base_path)?;

        // Replace atomically: temp file first, then rename over the key.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Deleted {}", path.display());
                Ok(())
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("game.win").expect("get"), None);

        store.set("game.win", "true").expect("set");
        assert_eq!(store.get("game.win").expect("get").as_deref(), Some("true"));
        assert_eq!(store.len(), 1);

        store.remove("game.win").expect("remove");
        store.remove("game.win").expect("remove absent");
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_write_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().join("saves"));

        store.set("game.inv", "[null,\"wood\"]").expect("write");
        let read = store.get("game.inv").expect("read");
        assert_eq!(read.as_deref(), Some("[null,\"wood\"]"));
        assert!(dir.path().join("saves").join("game.inv.json").exists());
    }

    #[test]
    fn test_file_store_missing_key() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("game.grid").expect("read"), None);
        store.remove("game.grid").expect("remove absent");
    }

    #[test]
    fn test_file_store_delete() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path());
        store.set("game.disc", "[]").expect("write");
        store.remove("game.disc").expect("delete");
        assert_eq!(store.get("game.disc").expect("read"), None);
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Unavailable("disk gone".to_string());
        assert!(err.to_string().contains("not available"));
    }
}
