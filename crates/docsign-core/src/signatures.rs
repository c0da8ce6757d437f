//! Signature lifecycle: signing, lookup and verification
//!
//! A signature binds a signer and the content they attested to a document
//! identity. The document is referenced, never embedded: every read resolves
//! it with a separate lookup, and a missing document resolves to `None`
//! rather than failing the read.
//!
//! Verification compares the checksum captured at signing time against the
//! fingerprint of the document's *current* content. It answers "has the
//! document changed since it was signed", not "is the record internally
//! consistent".

use docsign_store::{Collection, DocumentStore, Query, Row};
use std::sync::Arc;

use crate::checksum::fingerprint;
use crate::documents::DocumentRegistry;
use crate::model::{Signature, SignatureRecord, decode};
use crate::provenance::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::verification::Verification;
use crate::{Error, Result};

/// Policy knobs for [`SignatureManager`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Refuse to sign a document id that does not resolve.
    ///
    /// Off by default: dangling references are stored and simply never
    /// verify.
    pub require_existing_document: bool,
}

/// Creates, reads and verifies signatures against an injected store
pub struct SignatureManager<S: ?Sized> {
    store: Arc<S>,
    documents: DocumentRegistry<S>,
    options: ManagerOptions,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S: ?Sized> Clone for SignatureManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            documents: self.documents.clone(),
            options: self.options,
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<S: DocumentStore + ?Sized> SignatureManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            documents: DocumentRegistry::new(Arc::clone(&store)),
            store,
            options: ManagerOptions::default(),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Replace the registry used to resolve (and create) documents.
    ///
    /// It must wrap the same store as the manager.
    pub fn with_documents(mut self, documents: DocumentRegistry<S>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_options(mut self, options: ManagerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the identity source used for new signatures
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn options(&self) -> ManagerOptions {
        self.options
    }

    /// Registry used to resolve document references
    pub fn documents(&self) -> &DocumentRegistry<S> {
        &self.documents
    }

    /// Sign a document.
    ///
    /// The checksum is computed from `signed_content`, which may differ from
    /// the document's own content; in that case the signature never
    /// verifies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`] only when
    /// [`ManagerOptions::require_existing_document`] is set. Store failures
    /// always propagate.
    pub async fn create_signature(
        &self,
        document_id: &str,
        signed_by_email: &str,
        signed_content: &str,
    ) -> Result<Signature> {
        if self.options.require_existing_document
            && self.documents.get_document(document_id).await?.is_none()
        {
            return Err(Error::DocumentNotFound {
                id: document_id.to_string(),
            });
        }

        let id = self.ids.next_id();
        let record = SignatureRecord::sign(
            document_id.to_string(),
            signed_by_email.to_string(),
            signed_content.to_string(),
            self.clock.now(),
        );
        let data = serde_json::to_value(&record)?;
        self.store.insert(Collection::Signatures, &id, data).await?;
        tracing::info!(
            id = %id,
            document_id,
            signed_by = signed_by_email,
            checksum = %record.signed_checksum,
            "Created signature"
        );

        let document = self.documents.get_document(document_id).await?;
        if document.is_none() {
            tracing::warn!(id = %id, document_id, "Signature references a missing document");
        }
        Ok(Signature::from_record(id, record, document))
    }

    /// Read a signature with its document resolved. Does not verify.
    pub async fn get_signature(&self, id: &str) -> Result<Option<Signature>> {
        let Some(record) = self.load_record(id).await? else {
            return Ok(None);
        };
        let document = self.documents.get_document(&record.document_id).await?;
        Ok(Some(Signature::from_record(id.to_string(), record, document)))
    }

    /// Every signature, each with its document resolved individually
    pub async fn list_signatures(&self) -> Result<Vec<Signature>> {
        let rows = self
            .store
            .query(&Query::all(Collection::Signatures))
            .await?;
        self.resolve_rows(rows).await
    }

    /// The first signature recorded against `document_id`, in store order.
    ///
    /// Only one signature is returned even when several parties signed; use
    /// [`Self::list_signatures_by_document`] to see all of them.
    pub async fn get_signature_by_document_id(
        &self,
        document_id: &str,
    ) -> Result<Option<Signature>> {
        let rows = self.query_by_document(document_id).await?;
        let Some(first) = rows.into_iter().next() else {
            return Ok(None);
        };
        self.get_signature(&first.id).await
    }

    /// Every signature recorded against `document_id`, in store order
    pub async fn list_signatures_by_document(&self, document_id: &str) -> Result<Vec<Signature>> {
        let rows = self.query_by_document(document_id).await?;
        self.resolve_rows(rows).await
    }

    /// Fail-closed verification.
    ///
    /// Returns the signature only if the document still exists and its
    /// current content fingerprints to the signed checksum. A missing
    /// signature, a missing document and a mismatch all yield `None`.
    pub async fn verify_signature(&self, id: &str) -> Result<Option<Signature>> {
        Ok(self.check_signature(id).await?.into_valid())
    }

    /// Verification with the reason for failure kept
    pub async fn check_signature(&self, id: &str) -> Result<Verification> {
        let Some(record) = self.load_record(id).await? else {
            tracing::warn!(id, "Verification failed: signature missing");
            return Ok(Verification::SignatureMissing);
        };

        let Some(document) = self.documents.get_document(&record.document_id).await? else {
            tracing::warn!(id, document_id = %record.document_id, "Verification failed: document missing");
            return Ok(Verification::DocumentMissing {
                signature: Signature::from_record(id.to_string(), record, None),
            });
        };

        let actual = fingerprint(document.content());
        if actual == record.signed_checksum {
            tracing::debug!(id, "Signature verified");
            Ok(Verification::Valid(Signature::from_record(
                id.to_string(),
                record,
                Some(document),
            )))
        } else {
            tracing::warn!(
                id,
                expected = %record.signed_checksum,
                actual = %actual,
                "Verification failed: checksum mismatch"
            );
            let expected = record.signed_checksum.clone();
            Ok(Verification::ChecksumMismatch {
                signature: Signature::from_record(id.to_string(), record, Some(document)),
                expected,
                actual,
            })
        }
    }

    async fn load_record(&self, id: &str) -> Result<Option<SignatureRecord>> {
        match self.store.get(Collection::Signatures, id).await? {
            Some(data) => Ok(Some(decode(Collection::Signatures, id, data)?)),
            None => {
                tracing::debug!(id, "Signature not found");
                Ok(None)
            }
        }
    }

    async fn query_by_document(&self, document_id: &str) -> Result<Vec<Row>> {
        let query = Query::all(Collection::Signatures).field_eq("document_id", document_id);
        Ok(self.store.query(&query).await?)
    }

    async fn resolve_rows(&self, rows: Vec<Row>) -> Result<Vec<Signature>> {
        let mut signatures = Vec::with_capacity(rows.len());
        for row in rows {
            let record: SignatureRecord = decode(Collection::Signatures, &row.id, row.data)?;
            let document = self.documents.get_document(&record.document_id).await?;
            signatures.push(Signature::from_record(row.id, record, document));
        }
        Ok(signatures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewDocument;
    use crate::provenance::{FixedClock, SequentialIds};
    use crate::verification::VerificationStatus;
    use chrono::{TimeZone, Utc};
    use docsign_store::MemoryStore;
    use serde_json::json;

    fn manager() -> SignatureManager<MemoryStore> {
        SignatureManager::new(Arc::new(MemoryStore::new()))
            .with_id_generator(Arc::new(SequentialIds::new("S")))
    }

    #[tokio::test]
    async fn signature_uses_injected_clock() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let manager = manager().with_clock(Arc::new(FixedClock::new(ts)));

        let signature = manager
            .create_signature("D1", "alice@example.com", "Pay $100")
            .await
            .unwrap();
        assert_eq!(signature.signed_ts(), ts);
        assert_eq!(signature.id(), "S1");
    }

    #[tokio::test]
    async fn dangling_reference_is_accepted_by_default() {
        let manager = manager();
        let signature = manager
            .create_signature("ghost", "alice@example.com", "Pay $100")
            .await
            .unwrap();

        assert!(signature.document().is_none());
        assert_eq!(signature.document_id(), "ghost");
        assert!(manager.get_signature("S1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn strict_mode_rejects_dangling_reference_without_writing() {
        let store = Arc::new(MemoryStore::new());
        let manager = SignatureManager::new(Arc::clone(&store)).with_options(ManagerOptions {
            require_existing_document: true,
        });

        let err = manager
            .create_signature("ghost", "alice@example.com", "Pay $100")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound { ref id } if id == "ghost"));
        assert!(store.is_empty(Collection::Signatures).unwrap());
    }

    #[tokio::test]
    async fn strict_mode_signs_existing_document() {
        let manager = manager().with_options(ManagerOptions {
            require_existing_document: true,
        });
        let doc = manager
            .documents()
            .create_document(NewDocument::new("contract", "Pay $100"))
            .await
            .unwrap();

        let signature = manager
            .create_signature(doc.id(), "alice@example.com", "Pay $100")
            .await
            .unwrap();
        assert_eq!(signature.document(), Some(&doc));
    }

    #[tokio::test]
    async fn get_signature_does_not_verify() {
        let manager = manager();
        let doc = manager
            .documents()
            .create_document(NewDocument::new("contract", "Pay $100"))
            .await
            .unwrap();
        manager
            .create_signature(doc.id(), "alice@example.com", "Pay $999")
            .await
            .unwrap();

        // Readable even though it would not verify
        assert!(manager.get_signature("S1").await.unwrap().is_some());
        assert!(manager.verify_signature("S1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn check_reports_each_failure_mode() {
        let manager = manager();
        let doc = manager
            .documents()
            .create_document(NewDocument::new("contract", "Pay $100"))
            .await
            .unwrap();
        manager
            .create_signature(doc.id(), "alice@example.com", "Pay $100")
            .await
            .unwrap();
        manager
            .create_signature(doc.id(), "bob@example.com", "Pay $1000")
            .await
            .unwrap();

        assert_eq!(
            manager.check_signature("S1").await.unwrap().status(),
            VerificationStatus::Valid
        );
        assert_eq!(
            manager.check_signature("S2").await.unwrap().status(),
            VerificationStatus::ChecksumMismatch
        );
        assert_eq!(
            manager.check_signature("S404").await.unwrap().status(),
            VerificationStatus::SignatureMissing
        );

        manager.documents().delete_document(doc.id()).await.unwrap();
        let outcome = manager.check_signature("S1").await.unwrap();
        assert_eq!(outcome.status(), VerificationStatus::DocumentMissing);
        assert!(outcome.signature().unwrap().document().is_none());
    }

    #[tokio::test]
    async fn mismatch_reports_both_fingerprints() {
        let manager = manager();
        let doc = manager
            .documents()
            .create_document(NewDocument::new("contract", "Pay $100"))
            .await
            .unwrap();
        manager
            .create_signature(doc.id(), "alice@example.com", "Pay $1")
            .await
            .unwrap();

        match manager.check_signature("S1").await.unwrap() {
            Verification::ChecksumMismatch {
                signature,
                expected,
                actual,
            } => {
                assert_eq!(expected, fingerprint("Pay $1"));
                assert_eq!(actual, fingerprint("Pay $100"));
                assert_eq!(signature.signed_checksum(), &fingerprint("Pay $1"));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_record_is_an_error_not_absence() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(Collection::Signatures, "bad", json!({"document_id": "d1"}))
            .await
            .unwrap();
        let manager = SignatureManager::new(store);

        let err = manager.get_signature("bad").await.unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(manager.verify_signature("bad").await.is_err());
    }
}
