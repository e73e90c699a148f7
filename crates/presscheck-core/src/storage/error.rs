//! Storage error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Record with this ID already exists
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// Record not found
    #[error("record not found: {0}")]
    NotFound(String),

    /// Invalid record data
    #[error("invalid record data: {0}")]
    InvalidData(String),

    /// Storage backend error (database, filesystem, etc.)
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Query error
    #[error("query error: {0}")]
    Query(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Another run wrote the topic since it was read
    #[error("topic {id} was modified concurrently: expected version {expected}, found {found}")]
    VersionConflict {
        id: String,
        expected: u64,
        found: u64,
    },
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
