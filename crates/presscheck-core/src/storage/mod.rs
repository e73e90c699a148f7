//! Storage abstraction for candidates and topics
//!
//! Two traits cover persistence: [`CandidateStore`] for the discovery side and
//! [`TopicStore`] for verification. [`CandidateLookup`] is the narrow read
//! view the deduplicator uses. Implementations exist for:
//!
//! - **Memory**: In-memory storage for testing (`MemoryStore`)
//! - **SQLite**: Native SQLite via rusqlite (`presscheck-sqlite` crate)
//!
//! # Example
//!
//! ```rust
//! use presscheck_core::model::CandidateBuilder;
//! use presscheck_core::storage::{CandidateStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! let candidate = CandidateBuilder::new()
//!     .title("Nurses strike in Boston")
//!     .url("https://example.com/nurses")
//!     .build();
//!
//! store.insert_candidate(&candidate).unwrap();
//! assert!(store.get_candidate(&candidate.id).unwrap().is_some());
//! ```

mod error;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::{CandidateLookup, CandidateStore, TopicStore};
