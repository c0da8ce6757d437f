//! The `DocumentStore` contract
//!
//! Every operation is a single request against the backing store. There are
//! no transactions: callers that need several records read or write them
//! one at a time.

use async_trait::async_trait;
use serde_json::Value;

use crate::{Collection, Query, Result, Row};

/// Keyed collection store with simple query capability
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `data` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::KeyExists`] if the key is already present.
    async fn insert(&self, collection: Collection, key: &str, data: Value) -> Result<()>;

    /// Fetch the record stored under `key`, if any
    async fn get(&self, collection: Collection, key: &str) -> Result<Option<Value>>;

    /// Remove the record stored under `key`.
    ///
    /// Returns whether a record was removed.
    async fn remove(&self, collection: Collection, key: &str) -> Result<bool>;

    /// Run a scoped query. Rows come back in insertion order.
    async fn query(&self, query: &Query) -> Result<Vec<Row>>;
}
