//! Signature integrity model for docsign
//!
//! A signature records who attested to what content, against which
//! document, and when. Tamper evidence is a SHA-256 checksum of the signed
//! content; verification re-fingerprints the document's current content and
//! compares.
//!
//! # Architecture
//!
//! ```text
//!        docsign-server (JSON-RPC)
//!                 |
//!   SignatureManager ---> DocumentRegistry
//!          |                    |
//!       checksum          DocumentStore (docsign-store)
//! ```
//!
//! The store handle is injected at construction; nothing here holds global
//! state.
//!
//! # Example
//!
//! ```ignore
//! use docsign_core::{NewDocument, SignatureManager};
//! use docsign_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let manager = SignatureManager::new(Arc::new(MemoryStore::new()));
//! let doc = manager
//!     .documents()
//!     .create_document(NewDocument::new("contract", "Pay $100"))
//!     .await?;
//! let sig = manager
//!     .create_signature(doc.id(), "alice@example.com", "Pay $100")
//!     .await?;
//! assert!(manager.verify_signature(sig.id()).await?.is_some());
//! ```

pub mod checksum;
pub mod config;
pub mod documents;
pub mod error;
pub mod model;
pub mod provenance;
pub mod signatures;
pub mod verification;
pub mod watch;

pub use checksum::{Checksum, fingerprint};
pub use config::{ServiceConfig, SigningConfig, StoreConfig, WatchConfig};
pub use documents::DocumentRegistry;
pub use error::{Error, Result};
pub use model::{Document, Identified, NewDocument, Signature};
pub use provenance::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use signatures::{ManagerOptions, SignatureManager};
pub use verification::{Verification, VerificationStatus};
pub use watch::{WatchSource, Watcher};
