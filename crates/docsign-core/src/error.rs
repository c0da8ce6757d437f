//! Error types for docsign-core
//!
//! Absent records and failed verifications are not errors: they come back
//! as `None` or as a [`crate::Verification`] variant. What remains here are
//! store failures, undecodable records and rejected inputs.

use docsign_store::Collection;

/// Result type for docsign-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docsign-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing store failed; never masked
    #[error(transparent)]
    Store(#[from] docsign_store::Error),

    /// A stored record does not have the expected shape
    #[error("Failed to decode {collection} record {key}: {message}")]
    Decode {
        collection: Collection,
        key: String,
        message: String,
    },

    /// A checksum string is not a 64-character lowercase hex digest
    #[error("Invalid checksum {value:?}: expected 64 lowercase hex characters")]
    InvalidChecksum { value: String },

    /// Signing was refused because the referenced document does not exist
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
