//! Error types for SQLite storage backend

use presscheck_core::storage::StoreError;
use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, SqliteError>;

/// Errors that can occur during SQLite storage operations
#[derive(Debug, Error)]
pub enum SqliteError {
    /// Database connection or query error
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Row with given ID already exists
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// Row with given ID not found
    #[error("{0} not found")]
    NotFound(String),

    /// Stored value that does not decode (bad timestamp, unknown status)
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert SqliteError to StoreError for the storage traits
impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::AlreadyExists(id) => StoreError::AlreadyExists(id),
            SqliteError::NotFound(id) => StoreError::NotFound(id),
            SqliteError::Json(e) => StoreError::Serialization(e.to_string()),
            SqliteError::InvalidData(msg) => StoreError::InvalidData(msg),
            SqliteError::Database(e) => StoreError::Backend(format!("SQLite: {}", e)),
            SqliteError::Migration(msg) => StoreError::Backend(format!("Migration: {}", msg)),
            SqliteError::Io(e) => StoreError::Backend(format!("IO: {}", e)),
        }
    }
}

/// Map a raw rusqlite error straight to a StoreError
pub(crate) fn backend(err: rusqlite::Error) -> StoreError {
    SqliteError::from(err).into()
}
