//! SQLite storage backend for PressCheck
//!
//! This crate provides a persistent SQLite implementation of the
//! presscheck-core storage traits, so deduplication windows, candidate
//! lifecycles and topic verification survive between runs.
//!
//! # Features
//!
//! - Implements `CandidateStore`, `CandidateLookup` and `TopicStore`
//! - Embedded, versioned schema migrations
//! - Optimistic version guard on topic verification writes
//! - Supports in-memory databases for testing
//!
//! # Example
//!
//! ```rust,no_run
//! use presscheck_core::model::{CandidateBuilder, CandidateStatus};
//! use presscheck_core::storage::{CandidateLookup, CandidateStore};
//! use presscheck_sqlite::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::in_memory()?;
//!
//! let candidate = CandidateBuilder::new()
//!     .title("Nurses strike at county hospital")
//!     .url("https://example.com/nurses")
//!     .discovered_at_ms(1_700_000_000_000)
//!     .build();
//! store.insert_candidate(&candidate)?;
//!
//! assert!(store.url_seen_since("https://example.com/nurses", 0)?);
//! assert_eq!(store.candidates_by_status(CandidateStatus::Discovered)?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod json;
pub mod migrate;
pub mod store;

// Re-export main types
pub use error::{Result, SqliteError};
pub use store::SqliteStore;
