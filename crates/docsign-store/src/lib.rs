//! Document store for docsign
//!
//! Defines the keyed-collection contract ([`DocumentStore`]) the signing core
//! runs against, plus two adapters:
//!
//! - [`MemoryStore`]: in-process, insertion ordered
//! - [`FileStore`]: one JSON file per collection under a root directory,
//!   with advisory locking and atomic replacement
//!
//! Configuration loading ([`ConfigLoader`]) lives here too since it shares
//! the file I/O helpers.

pub mod collection;
pub mod config;
pub mod error;
pub mod file;
pub mod io;
pub mod memory;
pub mod query;
pub mod store;

pub use collection::Collection;
pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use query::{Query, Row};
pub use store::DocumentStore;
