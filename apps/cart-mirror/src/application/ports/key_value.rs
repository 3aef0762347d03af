//! Key-Value Storage Port (Driven Port)
//!
//! The persistence abstraction the store is written against: string keys,
//! string values, origin-scoped, shared by every context of that origin.
//! Implemented by adapters in the infrastructure layer.

use thiserror::Error;

/// Backend storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected a write for capacity reasons.
    #[error("storage quota exceeded writing key '{key}'")]
    QuotaExceeded {
        /// The key being written.
        key: String,
    },

    /// The backend is not usable at all.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Backend-provided detail.
        message: String,
    },

    /// Filesystem-level failure from a durable backend.
    #[error("storage i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for origin-scoped key-value persistence.
///
/// Any code holding the same key can mutate it concurrently from another
/// context; the last write wins. Implementations only move strings — the
/// store layers its own serialization on top.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` entirely. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
