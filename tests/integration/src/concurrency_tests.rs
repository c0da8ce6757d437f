//! Concurrent signing and deletion against both store backends

use docsign_core::{DocumentRegistry, NewDocument, SignatureManager};
use docsign_store::{DocumentStore, FileStore, MemoryStore};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;

const SIGNERS: usize = 16;

async fn sign_concurrently<S: DocumentStore + 'static>(store: Arc<S>) {
    let manager = SignatureManager::new(Arc::clone(&store));
    let doc = manager
        .documents()
        .create_document(NewDocument::new("contract", "Pay $100"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..SIGNERS {
        let manager = manager.clone();
        let doc_id = doc.id().to_string();
        handles.push(tokio::spawn(async move {
            manager
                .create_signature(&doc_id, &format!("signer{i}@x.com"), "Pay $100")
                .await
                .unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let sig = handle.await.unwrap();
        assert!(manager.verify_signature(sig.id()).await.unwrap().is_some());
        ids.insert(sig.id().to_string());
    }
    assert_eq!(ids.len(), SIGNERS);

    let recorded = manager.list_signatures_by_document(doc.id()).await.unwrap();
    assert_eq!(recorded.len(), SIGNERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signing_in_memory() {
    sign_concurrently(Arc::new(MemoryStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_signing_on_disk() {
    let temp = TempDir::new().unwrap();
    sign_concurrently(Arc::new(FileStore::open(temp.path()).unwrap())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_racing_verify_fails_closed() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileStore::open(temp.path()).unwrap());
    let manager = SignatureManager::new(Arc::clone(&store));
    let registry = DocumentRegistry::new(Arc::clone(&store));

    let doc = registry
        .create_document(NewDocument::new("contract", "Pay $100"))
        .await
        .unwrap();
    let sig = manager
        .create_signature(doc.id(), "alice@x.com", "Pay $100")
        .await
        .unwrap();

    let verifier = {
        let manager = manager.clone();
        let id = sig.id().to_string();
        tokio::spawn(async move {
            let mut outcomes = Vec::new();
            for _ in 0..50 {
                outcomes.push(manager.verify_signature(&id).await.unwrap().is_some());
                tokio::task::yield_now().await;
            }
            outcomes
        })
    };
    assert!(registry.delete_document(doc.id()).await.unwrap());

    let outcomes = verifier.await.unwrap();
    // Once a verification fails, no later one succeeds
    let first_failure = outcomes.iter().position(|valid| !valid);
    if let Some(index) = first_failure {
        assert!(outcomes[index..].iter().all(|valid| !valid));
    }
    assert!(manager.verify_signature(sig.id()).await.unwrap().is_none());
}
