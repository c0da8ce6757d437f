//! Scoped queries over a single collection
//!
//! The store supports one query shape: every row of a collection, optionally
//! narrowed by top-level field equality. That covers list operations and
//! foreign-key lookups without tying the contract to a query language.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Collection;

/// A stored record together with its key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Key the record was inserted under
    pub id: String,
    /// Record body
    pub data: Value,
}

impl Row {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Query against one collection with optional equality filters
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: Collection,
    filters: Vec<(String, Value)>,
}

impl Query {
    /// Select every row of `collection`
    pub fn all(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
        }
    }

    /// Keep only rows whose `field` equals `value`
    pub fn field_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    /// Whether a record body satisfies every filter.
    ///
    /// A missing field never matches.
    pub fn matches(&self, data: &Value) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| data.get(field) == Some(expected))
    }
}
