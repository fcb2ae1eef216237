//! Key-value store adapter
//!
//! Wraps a persistent string-keyed store holding JSON-serializable records
//! under fixed collection keys. The file-backed implementation keeps one
//! JSON document per key and uses atomic writes (write to temp file, then
//! rename) to prevent corruption.
//!
//! There are no transactional guarantees: two processes writing the same
//! key race, and the last write wins. Registries read, modify, and rewrite
//! whole collections, which matches the small expected collection sizes.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use super::error::{StoreError, StoreResult};

/// A persistent string-keyed store of JSON values
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Write `value` under `key`, replacing any existing value
    fn set(&self, key: &str, value: &Value) -> StoreResult<()>;

    /// Remove the value stored under `key`; removing an absent key is a no-op
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// File-backed store: one JSON file per key under a root directory
///
/// Stateless between calls; every read goes to disk and every write is a
/// full atomic rewrite of the key's file.
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The backing file for a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        let value = serde_json::from_str(&content).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            source: e,
        })?;

        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            source: e,
        })?;

        atomic_write(&self.path_for(key), &data)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::from_io(e, path)),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StoreError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StoreError::from_io(e, path.to_path_buf()))?;

    Ok(())
}
