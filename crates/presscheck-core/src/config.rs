//! Pipeline configuration
//!
//! Every section falls back to its defaults, so an empty JSON object is a
//! complete configuration.

use serde::{Deserialize, Serialize};

use crate::credibility::DomainLists;
use crate::crossref::CrossReferenceConfig;
use crate::dedup::DedupConfig;
use crate::facts::FactLexicon;
use crate::scoring::ScoringConfig;

/// Expected share of scored candidates that pass the gate.
///
/// Monitored only: a batch outside the band is logged, never corrected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionBand {
    pub min_rate: f64,
    pub max_rate: f64,
}

impl Default for AdmissionBand {
    fn default() -> Self {
        Self {
            min_rate: 0.10,
            max_rate: 0.20,
        }
    }
}

impl AdmissionBand {
    pub fn contains(&self, rate: f64) -> bool {
        rate >= self.min_rate && rate <= self.max_rate
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dedup: DedupConfig,
    pub scoring: ScoringConfig,
    pub admission_band: AdmissionBand,
    /// How far back approved candidates count as recent coverage for novelty
    pub recent_event_days: u32,
    pub domains: DomainLists,
    pub cross_reference: CrossReferenceConfig,
    pub facts: FactLexicon,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dedup: DedupConfig::default(),
            scoring: ScoringConfig::default(),
            admission_band: AdmissionBand::default(),
            recent_event_days: 14,
            domains: DomainLists::default(),
            cross_reference: CrossReferenceConfig::default(),
            facts: FactLexicon::default(),
        }
    }
}
