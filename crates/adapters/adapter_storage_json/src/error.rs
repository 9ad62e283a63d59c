//! Storage-specific error type wrapping IO and JSON errors.

use std::path::PathBuf;

use pironman_domain::error::PironmanError;

/// Errors originating from the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file does not hold valid JSON.
    #[error("invalid JSON in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document could not be serialized.
    #[error("failed to serialize config document")]
    Serialize(#[source] serde_json::Error),
}

impl From<StorageError> for PironmanError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
