//! Pipeline configuration loading
//!
//! Configuration is a JSON document deserialized into
//! [`PipelineConfig`]. Missing sections take their defaults, and the path
//! may also come from the `PRESSCHECK_CONFIG` environment variable.

use std::path::{Path, PathBuf};

use presscheck_core::PipelineConfig;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable naming a config file when no path is given
pub const CONFIG_ENV: &str = "PRESSCHECK_CONFIG";

/// Resolve which config file to read, if any
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Load configuration, falling back to defaults when no file is named.
///
/// Invalid weights or thresholds are reported here rather than when the
/// first batch is scored.
pub fn load(explicit: Option<&Path>) -> Result<PipelineConfig> {
    let config = match resolve_path(explicit) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            let config = parse(&text)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => {
            debug!("No configuration file, using defaults");
            PipelineConfig::default()
        }
    };
    validate(&config)?;
    Ok(config)
}

/// Parse a JSON configuration document
pub fn parse(text: &str) -> std::result::Result<PipelineConfig, serde_json::Error> {
    serde_json::from_str(text)
}

/// Check the numeric invariants the pipeline relies on
pub fn validate(config: &PipelineConfig) -> Result<()> {
    config.scoring.weights.validate()?;
    let threshold = config.scoring.admission_threshold;
    if !(0.0..=100.0).contains(&threshold) {
        return Err(Error::Config(format!(
            "admission_threshold must be within 0-100, got {}",
            threshold
        )));
    }
    let dedup = &config.dedup;
    if !(0.0..=1.0).contains(&dedup.similarity_threshold) {
        return Err(Error::Config(format!(
            "dedup.similarity_threshold must be within 0-1, got {}",
            dedup.similarity_threshold
        )));
    }
    let band = &config.admission_band;
    if band.min_rate > band.max_rate {
        return Err(Error::Config(format!(
            "admission_band.min_rate {} exceeds max_rate {}",
            band.min_rate, band.max_rate
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"scoring": {{"admission_threshold": 70}}, "dedup": {{"window_days": 3}}}}"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.scoring.admission_threshold, 70.0);
        assert_eq!(config.dedup.window_days, 3);
        assert_eq!(config.recent_event_days, 14);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(Some(&dir.path().join("absent.json")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(load(Some(file.path())), Err(Error::Config(_))));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = PipelineConfig::default();
        config.scoring.weights.worker_impact = 0.9;
        assert!(matches!(validate(&config), Err(Error::Scoring(_))));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = PipelineConfig::default();
        config.scoring.admission_threshold = 120.0;
        assert!(matches!(validate(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_default_config_is_valid() {
        validate(&PipelineConfig::default()).unwrap();
    }
}
