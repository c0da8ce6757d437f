//! JSON-RPC server for docsign
//!
//! Exposes document submission, signing and fail-closed verification as
//! tools over a line-delimited JSON-RPC 2.0 transport on stdio.
//!
//! # Architecture
//!
//! ```text
//! [ JSON-RPC client ]
//!        | (stdin / stdout)
//!        v
//! [ docsign-server ]  tools/list, tools/call
//!        | (Rust API)
//!        v
//! [ docsign-core ]    SignatureManager, DocumentRegistry, Watcher
//!        |
//!        v
//! [ docsign-store ]   memory or file backend
//! ```
//!
//! Logs go to stderr; stdout carries only protocol messages.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::DocsignServer;
pub use tools::{ToolContent, ToolDefinition, ToolResult, get_tool_definitions};
