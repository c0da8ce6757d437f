//! Directory-backed store with one JSON file per collection
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   documents.json     [{"id": ..., "data": {...}}, ...]
//!   signatures.json
//!   .documents.lock    advisory lock sidecars
//!   .signatures.lock
//! ```
//!
//! Each write re-reads the collection under an exclusive lock, applies the
//! change and replaces the file atomically, so concurrent processes sharing a
//! root never lose each other's inserts.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::io::{self, LockGuard};
use crate::{Collection, DocumentStore, Error, Query, Result, Row};

/// Document store persisted under a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (or lazily create) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| Error::io(&root, e))?;
        tracing::info!(root = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_path(&self, collection: Collection) -> PathBuf {
        self.root.join(format!("{}.json", collection))
    }

    fn lock_path(&self, collection: Collection) -> PathBuf {
        self.root.join(format!(".{}.lock", collection))
    }

    fn read_rows(&self, collection: Collection) -> Result<Vec<Row>> {
        let path = self.data_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = io::read_text(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| Error::Corrupt { path, source })
    }

    fn write_rows(&self, collection: Collection, rows: &[Row]) -> Result<()> {
        let content = serde_json::to_vec_pretty(rows)?;
        io::write_atomic(&self.data_path(collection), &content)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn insert(&self, collection: Collection, key: &str, data: Value) -> Result<()> {
        let _lock = LockGuard::exclusive(&self.lock_path(collection))?;
        let mut rows = self.read_rows(collection)?;
        if rows.iter().any(|row| row.id == key) {
            return Err(Error::KeyExists {
                collection,
                key: key.to_string(),
            });
        }
        rows.push(Row::new(key, data));
        self.write_rows(collection, &rows)?;
        tracing::debug!(%collection, key, "Inserted record");
        Ok(())
    }

    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>> {
        let _lock = LockGuard::shared(&self.lock_path(collection))?;
        let rows = self.read_rows(collection)?;
        Ok(rows.into_iter().find(|row| row.id == key).map(|row| row.data))
    }

    async fn remove(&self, collection: Collection, key: &str) -> Result<bool> {
        let _lock = LockGuard::exclusive(&self.lock_path(collection))?;
        let mut rows = self.read_rows(collection)?;
        let Some(pos) = rows.iter().position(|row| row.id == key) else {
            return Ok(false);
        };
        rows.remove(pos);
        self.write_rows(collection, &rows)?;
        tracing::debug!(%collection, key, "Removed record");
        Ok(true)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Row>> {
        let _lock = LockGuard::shared(&self.lock_path(query.collection()))?;
        let rows = self.read_rows(query.collection())?;
        Ok(rows
            .into_iter()
            .filter(|row| query.matches(&row.data))
            .collect())
    }
}
