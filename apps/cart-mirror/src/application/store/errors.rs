//! Store operation errors.

use thiserror::Error;

use crate::application::ports::StorageError;
use crate::domain::orders::PatchError;

/// Failures surfaced by store operations.
///
/// Lenient read accessors swallow these into defaults (with a logged
/// warning); the strict `try_*` accessors and every write operation
/// return them to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend refused the read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored value under a key is not valid JSON for its shape.
    #[error("corrupt value under key '{key}': {source}")]
    Corrupt {
        /// The key that was being read.
        key: String,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for persistence.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        /// The key that was being written.
        key: String,
        /// The underlying encode failure.
        #[source]
        source: serde_json::Error,
    },

    /// An order patch produced a record that no longer parses.
    #[error(transparent)]
    Patch(#[from] PatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_error_names_the_key() {
        let source = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err = StoreError::Corrupt {
            key: "cart".to_string(),
            source,
        };
        assert!(err.to_string().contains("cart"));
    }

    #[test]
    fn storage_error_passes_through() {
        let err: StoreError = StorageError::Unavailable {
            message: "offline".to_string(),
        }
        .into();
        assert!(err.to_string().contains("offline"));
    }
}
