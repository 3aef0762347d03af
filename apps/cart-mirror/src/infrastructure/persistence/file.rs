//! JSON-file storage backend.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::application::ports::{KeyValueStore, StorageError};

/// File-backed implementation of [`KeyValueStore`].
///
/// The whole key space is one JSON object on disk, rewritten on every
/// mutation — the durability analog of a platform-local store. Sized for
/// the small payloads this store holds, not for high write rates.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileBackend {
    /// Open the backing file at `path`, creating an empty key space when
    /// the file does not exist yet.
    ///
    /// # Errors
    ///
    /// `Unavailable` when an existing file does not parse; `Io` when it
    /// cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Unavailable {
                message: format!("corrupt backing file {}: {e}", path.display()),
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(StorageError::Io(e)),
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// The file this backend persists to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entries).map_err(|e| StorageError::Unavailable {
            message: format!("failed to encode backing file: {e}"),
        })?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KeyValueStore for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(error) = self.persist(&entries) {
            // Keep the in-memory view aligned with what is on disk.
            match previous {
                Some(v) => entries.insert(key.to_string(), v),
                None => entries.remove(key),
            };
            return Err(error);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let previous = entries.remove(key);
        if let Err(error) = self.persist(&entries) {
            if let Some(v) = previous {
                entries.insert(key.to_string(), v);
            }
            return Err(error);
        }
        Ok(())
    }
}
