//! Shared test utilities for the docsign workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`service`]: [`TestService`], a signing service over an in-memory or
//!   temp-dir store with pinned ids and clock
//! - [`tamper`]: helpers that mutate stored records behind the core's back

pub mod service;
pub mod tamper;

pub use service::TestService;
