//! Service configuration
//!
//! ```toml
//! [store]
//! backend = "file"          # or "memory"
//! path = "/var/lib/docsign"  # optional; defaults under the user data dir
//!
//! [signing]
//! require_existing_document = false
//!
//! [watch]
//! poll_interval_ms = 500
//! ```
//!
//! Every section is optional.

use docsign_store::{ConfigLoader, DocumentStore, FileStore, MemoryStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::signatures::ManagerOptions;
use crate::Result;

/// Directory name used under the platform data dir for the file backend
pub const DEFAULT_DATA_DIR_NAME: &str = "docsign";

/// Top-level service configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub store: StoreConfig,
    pub signing: SigningConfig,
    pub watch: WatchConfig,
}

/// Which store backend to open
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    #[default]
    Memory,
    File {
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub require_existing_document: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ServiceConfig {
    /// Load from a TOML, JSON or YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let config = ConfigLoader::new().load(path)?;
        Ok(config)
    }

    /// Point the store at a file-backed directory, overriding the backend
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = StoreConfig::File {
            path: Some(path.into()),
        };
        self
    }

    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            require_existing_document: self.signing.require_existing_document,
        }
    }

    /// Open the configured store.
    ///
    /// The handle is meant to be acquired once at start-up and shared.
    pub fn open_store(&self) -> Result<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match self.store.data_dir() {
            Some(root) => Arc::new(FileStore::open(root)?),
            None => {
                tracing::info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(store)
    }
}

impl StoreConfig {
    /// Directory the file backend should use, or `None` for memory
    pub fn data_dir(&self) -> Option<PathBuf> {
        match self {
            StoreConfig::Memory => None,
            StoreConfig::File { path: Some(path) } => Some(path.clone()),
            StoreConfig::File { path: None } => Some(
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(DEFAULT_DATA_DIR_NAME),
            ),
        }
    }
}
