//! Tool handlers
//!
//! Each handler parses its arguments, calls into the signing core and
//! returns plain JSON. Absent records come back as `null`; only bad
//! arguments and store failures are errors.

use std::time::Duration;

use docsign_core::{NewDocument, SignatureManager, Verification, Watcher};
use docsign_store::DocumentStore;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::{Error, Result};

/// Manager over whichever store the configuration selected
pub type Manager = SignatureManager<dyn DocumentStore>;

/// Watcher backing `next_signature`
pub type SignatureWatcher = Watcher<Manager>;

/// What a tool call can reach
pub struct ToolContext<'a> {
    pub manager: &'a Manager,
    /// `None` until the server is initialized
    pub watcher: Option<&'a Mutex<SignatureWatcher>>,
}

/// Handle a tool call by dispatching to the appropriate handler
pub async fn handle_tool_call(
    ctx: &ToolContext<'_>,
    tool_name: &str,
    arguments: Value,
) -> Result<Value> {
    tracing::debug!(tool = tool_name, "Dispatching tool call");
    let manager = ctx.manager;
    match tool_name {
        // Signing
        "sign_document" => handle_sign_document(manager, arguments).await,

        // Signature queries
        "signature" => handle_signature(manager, arguments).await,
        "signatures" => to_json(manager.list_signatures().await?),
        "get_signature_by_document" => handle_signature_by_document(manager, arguments).await,
        "signatures_by_document" => handle_signatures_by_document(manager, arguments).await,
        "verify_signature" => handle_verify_signature(manager, arguments).await,
        "signature_status" => handle_signature_status(manager, arguments).await,
        "next_signature" => handle_next_signature(ctx.watcher, arguments).await,

        // Documents
        "add_document" => handle_add_document(manager, arguments).await,
        "remove_document" => handle_remove_document(manager, arguments).await,
        "document" => handle_document(manager, arguments).await,
        "documents" => to_json(manager.documents().list_documents().await?),

        _ => Err(Error::UnknownTool(tool_name.to_string())),
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments).map_err(|e| Error::InvalidArgument(e.to_string()))
}

fn to_json(value: impl serde::Serialize) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DocumentIdArgs {
    document_id: String,
}

// ============================================================================
// Signing
// ============================================================================

#[derive(Debug, Deserialize)]
struct SignDocumentArgs {
    document_id: String,
    signed_by_email: String,
    signed_content: String,
}

async fn handle_sign_document(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: SignDocumentArgs = parse_args(arguments)?;
    let signature = manager
        .create_signature(&args.document_id, &args.signed_by_email, &args.signed_content)
        .await?;
    to_json(signature)
}

// ============================================================================
// Signature queries
// ============================================================================

async fn handle_signature(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: IdArgs = parse_args(arguments)?;
    to_json(manager.get_signature(&args.id).await?)
}

async fn handle_signature_by_document(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: DocumentIdArgs = parse_args(arguments)?;
    to_json(manager.get_signature_by_document_id(&args.document_id).await?)
}

async fn handle_signatures_by_document(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: DocumentIdArgs = parse_args(arguments)?;
    to_json(manager.list_signatures_by_document(&args.document_id).await?)
}

async fn handle_verify_signature(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: IdArgs = parse_args(arguments)?;
    to_json(manager.verify_signature(&args.id).await?)
}

async fn handle_signature_status(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: IdArgs = parse_args(arguments)?;
    let check = manager.check_signature(&args.id).await?;
    let (expected_checksum, actual_checksum) = match &check {
        Verification::ChecksumMismatch {
            expected, actual, ..
        } => (Some(expected.to_string()), Some(actual.to_string())),
        _ => (None, None),
    };

    Ok(json!({
        "id": args.id,
        "status": check.status(),
        "valid": check.is_valid(),
        "signature": check.signature(),
        "expected_checksum": expected_checksum,
        "actual_checksum": actual_checksum,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct NextSignatureArgs {
    #[serde(default)]
    timeout_ms: u64,
}

async fn handle_next_signature(
    watcher: Option<&Mutex<SignatureWatcher>>,
    arguments: Value,
) -> Result<Value> {
    let args: NextSignatureArgs = parse_args(arguments)?;
    let watcher = watcher.ok_or(Error::NotInitialized)?;
    let mut watcher = watcher.lock().await;

    match tokio::time::timeout(Duration::from_millis(args.timeout_ms), watcher.next()).await {
        Ok(signature) => to_json(signature?),
        Err(_) => Ok(Value::Null),
    }
}

// ============================================================================
// Documents
// ============================================================================

#[derive(Debug, Deserialize)]
struct AddDocumentArgs {
    name: String,
    content: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
}

async fn handle_add_document(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: AddDocumentArgs = parse_args(arguments)?;
    let new = NewDocument::new(args.name, args.content).submitted_by(
        args.first_name,
        args.last_name,
        args.email,
    );
    to_json(manager.documents().create_document(new).await?)
}

async fn handle_remove_document(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: IdArgs = parse_args(arguments)?;
    let removed = manager.documents().delete_document(&args.id).await?;
    Ok(json!({ "id": args.id, "removed": removed }))
}

async fn handle_document(manager: &Manager, arguments: Value) -> Result<Value> {
    let args: IdArgs = parse_args(arguments)?;
    to_json(manager.documents().get_document(&args.id).await?)
}
