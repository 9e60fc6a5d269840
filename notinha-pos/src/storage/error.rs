//! Storage error types

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Persistence failures
///
/// A missing file is never an error; stores treat it as empty or default.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Read, write or rename failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exists but does not hold a valid record
    #[error("Invalid data in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
