//! Common error types for PressCheck binaries.

use presscheck_core::pipeline::PipelineError;
use presscheck_core::scoring::ScoringError;
use presscheck_core::storage::StoreError;
use presscheck_core::credibility::CredibilityError;
use presscheck_sqlite::SqliteError;
use thiserror::Error;

/// Common error type for PressCheck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage trait error
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// SQLite backend error (opening, migrating)
    #[error("database error: {0}")]
    Database(#[from] SqliteError),

    /// Evaluation or verification run failed
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("credibility error: {0}")]
    Credibility(#[from] CredibilityError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias using PressCheck Error.
pub type Result<T> = std::result::Result<T, Error>;
