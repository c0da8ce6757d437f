//! Tool definitions
//!
//! ## Signing
//! - `sign_document` - Record a signature against a document
//!
//! ## Signature queries
//! - `signature`, `signatures` - Read signatures with their documents resolved
//! - `get_signature_by_document` - First signature for a document
//! - `signatures_by_document` - Every signature for a document
//! - `verify_signature` - The signature if it still matches its document, else `null`
//! - `signature_status` - Verification outcome with the reason for failure
//! - `next_signature` - Wait for a signature created after the last observation
//!
//! ## Documents
//! - `add_document`, `remove_document`, `document`, `documents`

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Tool definition for the `tools/list` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }
}

fn tool(name: &str, description: &str, input_schema: serde_json::Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn id_schema(description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "description": description }
        },
        "required": ["id"]
    })
}

fn document_id_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "document_id": { "type": "string", "description": "Document identity" }
        },
        "required": ["document_id"]
    })
}

fn no_arguments() -> serde_json::Value {
    json!({ "type": "object", "properties": {} })
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        // Signing
        tool(
            "sign_document",
            "Sign a document. The checksum is computed from signed_content; the \
             document does not have to exist unless the server requires it.",
            json!({
                "type": "object",
                "properties": {
                    "document_id": { "type": "string", "description": "Document being signed" },
                    "signed_by_email": { "type": "string", "description": "Signer's email" },
                    "signed_content": { "type": "string", "description": "Exact content attested to" }
                },
                "required": ["document_id", "signed_by_email", "signed_content"]
            }),
        ),
        // Signature queries
        tool(
            "signature",
            "Get a signature by id, without verifying it",
            id_schema("Signature identity"),
        ),
        tool("signatures", "List every signature", no_arguments()),
        tool(
            "get_signature_by_document",
            "Get the first signature recorded against a document",
            document_id_schema(),
        ),
        tool(
            "signatures_by_document",
            "List every signature recorded against a document",
            document_id_schema(),
        ),
        tool(
            "verify_signature",
            "Return the signature only if its document still exists and still \
             matches the signed checksum; null otherwise",
            id_schema("Signature identity"),
        ),
        tool(
            "signature_status",
            "Verify a signature and report why it failed",
            id_schema("Signature identity"),
        ),
        tool(
            "next_signature",
            "Return the next signature created since the previous call, or null \
             once the timeout elapses",
            json!({
                "type": "object",
                "properties": {
                    "timeout_ms": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "How long to wait; 0 polls once"
                    }
                }
            }),
        ),
        // Documents
        tool(
            "add_document",
            "Submit a document for signing",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "content": { "type": "string" },
                    "first_name": { "type": "string", "description": "Submitter's first name" },
                    "last_name": { "type": "string", "description": "Submitter's last name" },
                    "email": { "type": "string", "description": "Submitter's email" }
                },
                "required": ["name", "content"]
            }),
        ),
        tool(
            "remove_document",
            "Delete a document. Its signatures remain but stop verifying.",
            id_schema("Document identity"),
        ),
        tool("document", "Get a document by id", id_schema("Document identity")),
        tool("documents", "List every document", no_arguments()),
    ]
}
