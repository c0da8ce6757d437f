//! End-to-end scenarios across config, server, core and store
//!
//! Each scenario loads a real config file, opens a file-backed store and
//! drives the server through JSON-RPC messages, the way a client would.

use docsign_core::{ServiceConfig, fingerprint};
use docsign_server::DocsignServer;
use docsign_store::FileStore;
use docsign_test_utils::tamper;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a config pointing the file backend at `<dir>/data`
fn write_config(dir: &Path, strict: bool) -> std::path::PathBuf {
    let config = dir.join("docsign.toml");
    fs::write(
        &config,
        format!(
            r#"
[store]
backend = "file"
path = "{}"

[signing]
require_existing_document = {strict}

[watch]
poll_interval_ms = 10
"#,
            dir.join("data").display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();
    config
}

async fn start(config: &Path) -> DocsignServer {
    let config = ServiceConfig::load(config).unwrap();
    let mut server = DocsignServer::from_config(&config).unwrap();
    server.initialize().await.unwrap();
    server
}

/// Call a tool and return its decoded payload, or the error text
async fn call(server: &DocsignServer, tool: &str, arguments: Value) -> Result<Value, String> {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": tool, "arguments": arguments }
    });
    let response: Value =
        serde_json::from_str(&server.handle_message(&message.to_string()).await.unwrap()).unwrap();
    let text = response["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    if response["result"]["isError"] == true {
        Err(text)
    } else {
        Ok(serde_json::from_str(&text).unwrap())
    }
}

#[tokio::test]
async fn test_sign_tamper_and_restore_on_disk() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), false);
    let server = start(&config).await;

    let doc = call(
        &server,
        "add_document",
        json!({ "name": "contract", "content": "Pay $100" }),
    )
    .await
    .unwrap();
    let doc_id = doc["id"].as_str().unwrap();

    let sig = call(
        &server,
        "sign_document",
        json!({
            "document_id": doc_id,
            "signed_by_email": "alice@x.com",
            "signed_content": "Pay $100"
        }),
    )
    .await
    .unwrap();
    assert_eq!(sig["signed_checksum"], fingerprint("Pay $100").to_string());

    // A second handle on the same directory edits the document
    let store = FileStore::open(temp.path().join("data")).unwrap();
    tamper::replace_document_content(&store, doc_id, "Pay $1000").await;

    let status = call(&server, "signature_status", json!({ "id": sig["id"] }))
        .await
        .unwrap();
    assert_eq!(status["status"], "checksum_mismatch");
    assert_eq!(
        call(&server, "verify_signature", json!({ "id": sig["id"] }))
            .await
            .unwrap(),
        Value::Null
    );

    tamper::replace_document_content(&store, doc_id, "Pay $100").await;
    let verified = call(&server, "verify_signature", json!({ "id": sig["id"] }))
        .await
        .unwrap();
    assert_eq!(verified["id"], sig["id"]);
}

#[tokio::test]
async fn test_restart_preserves_signatures() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), false);

    let sig = {
        let server = start(&config).await;
        call(&server, "add_document", json!({ "name": "n", "content": "c" }))
            .await
            .unwrap();
        let docs = call(&server, "documents", Value::Null).await.unwrap();
        call(
            &server,
            "sign_document",
            json!({
                "document_id": docs[0]["id"],
                "signed_by_email": "bob@x.com",
                "signed_content": "c"
            }),
        )
        .await
        .unwrap()
    };

    let server = start(&config).await;
    let verified = call(&server, "verify_signature", json!({ "id": sig["id"] }))
        .await
        .unwrap();
    assert_eq!(verified, sig);
}

#[tokio::test]
async fn test_strict_config_refuses_dangling_reference() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), true);
    let server = start(&config).await;

    let err = call(
        &server,
        "sign_document",
        json!({
            "document_id": "ghost",
            "signed_by_email": "alice@x.com",
            "signed_content": "x"
        }),
    )
    .await
    .unwrap_err();

    assert!(err.contains("Document not found: ghost"), "{err}");
    let listed = call(&server, "signatures", Value::Null).await.unwrap();
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_subscriber_sees_signatures_from_another_server() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), false);
    let watcher = start(&config).await;
    let signer = start(&config).await;

    let sig = call(
        &signer,
        "sign_document",
        json!({
            "document_id": "D1",
            "signed_by_email": "carol@x.com",
            "signed_content": "x"
        }),
    )
    .await
    .unwrap();

    let seen = call(&watcher, "next_signature", json!({ "timeout_ms": 2000 }))
        .await
        .unwrap();
    assert_eq!(seen["id"], sig["id"]);

    // Signatures created by the subscriber itself are reported too
    let own = call(
        &watcher,
        "sign_document",
        json!({
            "document_id": "D1",
            "signed_by_email": "dave@x.com",
            "signed_content": "x"
        }),
    )
    .await
    .unwrap();
    let seen = call(&watcher, "next_signature", json!({ "timeout_ms": 2000 }))
        .await
        .unwrap();
    assert_eq!(seen["id"], own["id"]);
}
