//! Polling change notification
//!
//! A [`Watcher`] turns a listable source into a lazy, never-ending sequence
//! of entities it has not seen before. Each call to [`Watcher::next`] polls
//! the source at a fixed interval until something new shows up. Dropping the
//! future cancels the wait without side effects.

use async_trait::async_trait;
use docsign_store::DocumentStore;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use crate::documents::DocumentRegistry;
use crate::model::{Document, Identified, Signature};
use crate::signatures::SignatureManager;
use crate::Result;

/// Something a [`Watcher`] can poll
#[async_trait]
pub trait WatchSource: Send + Sync {
    type Item: Identified + Send;

    /// Current contents of the source, in store order
    async fn snapshot(&self) -> Result<Vec<Self::Item>>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> WatchSource for DocumentRegistry<S> {
    type Item = Document;

    async fn snapshot(&self) -> Result<Vec<Document>> {
        self.list_documents().await
    }
}

#[async_trait]
impl<S: DocumentStore + ?Sized> WatchSource for SignatureManager<S> {
    type Item = Signature;

    async fn snapshot(&self) -> Result<Vec<Signature>> {
        self.list_signatures().await
    }
}

/// Yields entities that appear in a source after the watcher was (re)started
pub struct Watcher<W: WatchSource> {
    source: W,
    poll_interval: Duration,
    seen: HashSet<String>,
    pending: VecDeque<W::Item>,
}

impl<W: WatchSource> Watcher<W> {
    /// Start watching; everything already in the source counts as seen.
    pub async fn start(source: W, poll_interval: Duration) -> Result<Self> {
        let mut watcher = Self {
            source,
            poll_interval,
            seen: HashSet::new(),
            pending: VecDeque::new(),
        };
        watcher.restart().await?;
        Ok(watcher)
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Forget pending items and treat the current contents as seen
    pub async fn restart(&mut self) -> Result<()> {
        let snapshot = self.source.snapshot().await?;
        self.pending.clear();
        self.seen = snapshot.iter().map(|item| item.id().to_string()).collect();
        tracing::debug!(seen = self.seen.len(), "Watcher seeded");
        Ok(())
    }

    /// Poll once, returning newly observed items without waiting
    pub async fn poll(&mut self) -> Result<Vec<W::Item>> {
        let snapshot = self.source.snapshot().await?;
        let fresh: Vec<W::Item> = snapshot
            .into_iter()
            .filter(|item| self.seen.insert(item.id().to_string()))
            .collect();
        if !fresh.is_empty() {
            tracing::debug!(count = fresh.len(), "Watcher observed new entities");
        }
        Ok(fresh)
    }

    /// Wait for the next unseen item, polling every `poll_interval`.
    ///
    /// Never returns `Ok` without an item; store failures end the wait.
    pub async fn next(&mut self) -> Result<W::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Ok(item);
            }
            let fresh = self.poll().await?;
            if fresh.is_empty() {
                tokio::time::sleep(self.poll_interval).await;
            } else {
                self.pending.extend(fresh);
            }
        }
    }
}
