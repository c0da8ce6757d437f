//! Error types for docsign-store

use std::path::PathBuf;

use crate::Collection;

/// Result type for docsign-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docsign-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Key {key} already exists in {collection}")]
    KeyExists { collection: Collection, key: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt collection file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("In-memory store lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
