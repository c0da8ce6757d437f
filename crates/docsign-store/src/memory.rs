//! In-process store backed by a locked map
//!
//! Rows are kept per collection in insertion order so queries are
//! deterministic. Lookups are linear scans; this adapter is meant for tests
//! and single-process deployments with small collections.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::{Collection, DocumentStore, Error, Query, Result, Row};

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `collection`
    pub fn len(&self, collection: Collection) -> Result<usize> {
        let guard = self.collections.read().map_err(|_| Error::Poisoned)?;
        Ok(guard.get(&collection).map_or(0, Vec::len))
    }

    pub fn is_empty(&self, collection: Collection) -> Result<bool> {
        Ok(self.len(collection)? == 0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, key: &str, data: Value) -> Result<()> {
        let mut guard = self.collections.write().map_err(|_| Error::Poisoned)?;
        let rows = guard.entry(collection).or_default();
        if rows.iter().any(|row| row.id == key) {
            return Err(Error::KeyExists {
                collection,
                key: key.to_string(),
            });
        }
        rows.push(Row::new(key, data));
        tracing::debug!(%collection, key, "Inserted record");
        Ok(())
    }

    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>> {
        let guard = self.collections.read().map_err(|_| Error::Poisoned)?;
        Ok(guard
            .get(&collection)
            .and_then(|rows| rows.iter().find(|row| row.id == key))
            .map(|row| row.data.clone()))
    }

    async fn remove(&self, collection: Collection, key: &str) -> Result<bool> {
        let mut guard = self.collections.write().map_err(|_| Error::Poisoned)?;
        let Some(rows) = guard.get_mut(&collection) else {
            return Ok(false);
        };
        let Some(pos) = rows.iter().position(|row| row.id == key) else {
            return Ok(false);
        };
        rows.remove(pos);
        tracing::debug!(%collection, key, "Removed record");
        Ok(true)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Row>> {
        let guard = self.collections.read().map_err(|_| Error::Poisoned)?;
        Ok(guard
            .get(&query.collection())
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.matches(&row.data))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
