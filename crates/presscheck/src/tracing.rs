//! Logging utilities with PressCheck stage prefixes.
//!
//! Provides consistent logging setup across PressCheck binaries. Logs go to
//! stderr so command output on stdout stays machine-readable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with PressCheck defaults.
///
/// Sets up tracing-subscriber with:
/// - Environment filter (RUST_LOG)
/// - Compact format on stderr
pub fn init() {
    init_with_filter("info");
}

/// Initialize tracing with a custom default filter.
///
/// RUST_LOG still wins when set. A second call is a no-op.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// Stage prefixes for logging.
pub mod prefix {
    /// Candidate evaluation (dedup, scoring, admission)
    pub const EVALUATE: &str = "⚖";
    /// Topic verification
    pub const VERIFY: &str = "✓";
    /// Database operations prefix
    pub const DB: &str = "⊔";
}
