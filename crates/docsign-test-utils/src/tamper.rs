//! Direct record mutation, bypassing the core.
//!
//! The core has no update path for documents, so tamper scenarios are set up
//! by rewriting the stored record in place: remove it and insert a modified
//! copy under the same key.

use docsign_store::{Collection, DocumentStore};
use serde_json::Value;

/// Overwrite one top-level field of a stored record.
///
/// # Panics
/// Panics if the record does not exist or the store fails.
pub async fn set_field<S: DocumentStore + ?Sized>(
    store: &S,
    collection: Collection,
    key: &str,
    field: &str,
    value: impl Into<Value>,
) {
    let mut data = store
        .get(collection, key)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("set_field: no {collection} record {key}"));
    data[field] = value.into();
    assert!(store.remove(collection, key).await.unwrap());
    store.insert(collection, key, data).await.unwrap();
}

/// Change a document's stored content, leaving its stored checksum stale.
pub async fn replace_document_content<S: DocumentStore + ?Sized>(
    store: &S,
    document_id: &str,
    content: &str,
) {
    set_field(store, Collection::Documents, document_id, "content", content).await;
}
