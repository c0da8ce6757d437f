//! Document registry
//!
//! Documents are written once with the checksum of their content and are
//! never updated in place; the only way to change one is to delete it.

use docsign_store::{Collection, DocumentStore, Query};
use std::sync::Arc;

use crate::model::{Document, DocumentRecord, NewDocument, decode};
use crate::provenance::{IdGenerator, UuidGenerator};
use crate::Result;

/// Create, read and delete documents against an injected store
pub struct DocumentRegistry<S: ?Sized> {
    store: Arc<S>,
    ids: Arc<dyn IdGenerator>,
}

impl<S: ?Sized> Clone for DocumentRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<S: DocumentStore + ?Sized> DocumentRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Replace the identity source
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Persist a new document under a fresh identity.
    pub async fn create_document(&self, new: NewDocument) -> Result<Document> {
        let document = Document::create(self.ids.next_id(), new);
        let data = serde_json::to_value(document.to_record())?;
        self.store
            .insert(Collection::Documents, document.id(), data)
            .await?;
        tracing::info!(id = document.id(), checksum = %document.checksum(), "Created document");
        Ok(document)
    }

    /// Look up a document by identity
    pub async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let Some(data) = self.store.get(Collection::Documents, id).await? else {
            tracing::debug!(id, "Document not found");
            return Ok(None);
        };
        let record: DocumentRecord = decode(Collection::Documents, id, data)?;
        Ok(Some(Document::from_record(id.to_string(), record)))
    }

    /// Every stored document, in store order
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        let rows = self.store.query(&Query::all(Collection::Documents)).await?;
        rows.into_iter()
            .map(|row| {
                let record: DocumentRecord = decode(Collection::Documents, &row.id, row.data)?;
                Ok(Document::from_record(row.id, record))
            })
            .collect()
    }

    /// Delete a document. Returns whether it existed.
    ///
    /// Signatures that reference it are left in place; they stop verifying.
    pub async fn delete_document(&self, id: &str) -> Result<bool> {
        let removed = self.store.remove(Collection::Documents, id).await?;
        if removed {
            tracing::info!(id, "Deleted document");
        }
        Ok(removed)
    }
}
