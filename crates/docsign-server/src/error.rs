//! Error types for the signing server

use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving requests
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the signing core, including store failures
    #[error("core error: {0}")]
    Core(#[from] docsign_core::Error),

    /// Error during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tool arguments did not match the tool's schema
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown tool requested
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A tool that needs server state was called before `initialize`
    #[error("server not initialized")]
    NotInitialized,

    /// IO error on the stdio transport
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<docsign_store::Error> for Error {
    fn from(err: docsign_store::Error) -> Self {
        Error::Core(err.into())
    }
}
