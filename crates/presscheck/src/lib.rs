//! # PressCheck Shared Rust Library
//!
//! Shared infrastructure for the PressCheck binaries:
//! - **error**: Common error type wrapping core, storage and IO failures
//! - **tracing**: Logging setup with stage prefixes
//! - **config**: Loading [`presscheck_core::PipelineConfig`] from JSON files
//!
//! ## Usage
//!
//! ```rust,ignore
//! use presscheck::config;
//! use presscheck::error::Error;
//!
//! presscheck::tracing::init();
//! let config = config::load(None)?;
//! ```

pub mod config;
pub mod error;
pub mod tracing;

pub use error::{Error, Result};
