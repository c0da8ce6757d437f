//! [`TestService`] fixture for signing scenarios.

use chrono::{DateTime, TimeZone, Utc};
use docsign_core::{
    Document, FixedClock, ManagerOptions, NewDocument, SequentialIds, SignatureManager,
};
use docsign_store::{DocumentStore, FileStore, MemoryStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Instant every [`TestService`] clock starts at
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// A signature manager with predictable ids (`D1`, `D2`, ... for documents,
/// `S1`, `S2`, ... for signatures) and a fixed clock.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() {
/// use docsign_test_utils::TestService;
///
/// let service = TestService::in_memory();
/// let doc = service.seed_document("contract", "Pay $100").await;
/// assert_eq!(doc.id(), "D1");
/// # }
/// ```
pub struct TestService<S: ?Sized = MemoryStore> {
    pub store: Arc<S>,
    pub manager: SignatureManager<S>,
    pub clock: Arc<FixedClock>,
    _dir: Option<TempDir>,
}

impl TestService<MemoryStore> {
    /// Service over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), ManagerOptions::default(), None)
    }

    /// In-memory service that refuses to sign unknown documents
    pub fn strict() -> Self {
        Self::with_store(
            Arc::new(MemoryStore::new()),
            ManagerOptions {
                require_existing_document: true,
            },
            None,
        )
    }
}

impl TestService<FileStore> {
    /// Service over a file store in a temporary directory.
    ///
    /// The directory lives as long as the service.
    pub fn on_disk() -> Self {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileStore::open(dir.path()).unwrap());
        Self::with_store(store, ManagerOptions::default(), Some(dir))
    }
}

impl<S: DocumentStore + ?Sized> TestService<S> {
    fn with_store(store: Arc<S>, options: ManagerOptions, dir: Option<TempDir>) -> Self {
        let clock = Arc::new(FixedClock::new(epoch()));
        let documents = docsign_core::DocumentRegistry::new(Arc::clone(&store))
            .with_id_generator(Arc::new(SequentialIds::new("D")));
        let manager = SignatureManager::new(Arc::clone(&store))
            .with_documents(documents)
            .with_options(options)
            .with_clock(clock.clone())
            .with_id_generator(Arc::new(SequentialIds::new("S")));
        Self {
            store,
            manager,
            clock,
            _dir: dir,
        }
    }

    /// Create a document with placeholder submitter details
    pub async fn seed_document(&self, name: &str, content: &str) -> Document {
        self.manager
            .documents()
            .create_document(
                NewDocument::new(name, content).submitted_by("Test", "Submitter", "submitter@example.com"),
            )
            .await
            .unwrap()
    }
}
