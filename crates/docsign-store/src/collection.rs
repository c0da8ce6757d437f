//! Named collections within the store

use serde::{Deserialize, Serialize};
use std::fmt;

/// A keyed collection of JSON records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Documents,
    Signatures,
}

impl Collection {
    /// All collections, in a stable order
    pub const ALL: [Collection; 2] = [Collection::Documents, Collection::Signatures];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Documents => "documents",
            Collection::Signatures => "signatures",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
