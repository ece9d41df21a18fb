use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a save request. Nothing is stored when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a keyword.")]
    EmptyKeyword,
}

/// Failures of the entry store. These never leave the store: they are logged
/// and the caller carries on with whatever is in memory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{path} does not hold a list of entries")]
    NotAnArray { path: PathBuf },

    #[error("failed to encode entries: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
