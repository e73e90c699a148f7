//! Multi-dimensional newsworthiness scoring
//!
//! Six independent scorers each rate a candidate 0-10 along one dimension:
//!
//! - **Worker Impact**: collective action, wages, sectors, head counts
//! - **Timeliness**: urgency and how recently the event happened
//! - **Verifiability**: how checkable the signal is
//! - **Regional**: population reach
//! - **Conflict**: tension between parties
//! - **Novelty**: first-of-kind versus routine or already covered
//!
//! A fixed-weight [`CombinedScorer`] folds them into a 0-100 admission score.
//!
//! # Example
//!
//! ```rust
//! use presscheck_core::scoring::{CombinedScorer, ScoreInput, ScoringConfig};
//!
//! let scorer = CombinedScorer::new(ScoringConfig::default()).unwrap();
//! let input = ScoreInput::new("Nurses strike at Boston hospital", "");
//! let breakdown = scorer.evaluate(&input);
//! assert!(breakdown.worker_impact >= 3.0);
//! ```

mod combiner;
mod conflict;
pub mod lexicon;
mod novelty;
mod regional;
mod timeliness;
mod verifiability;
mod worker_impact;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Candidate;
use crate::text::MatchText;

pub use combiner::{CombinedScorer, ScoreBreakdown, ScoringConfig, Weights};
pub use conflict::ConflictScorer;
pub use lexicon::Lexicons;
pub use novelty::NoveltyScorer;
pub use regional::RegionalScorer;
pub use timeliness::TimelinessScorer;
pub use verifiability::VerifiabilityScorer;
pub use worker_impact::WorkerImpactScorer;

/// Upper bound of every dimension score
pub const MAX_DIMENSION_SCORE: f64 = 10.0;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Scoring configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("dimension weights must be non-negative and sum to 1.0 (got {0:.3})")]
    InvalidWeights(f64),

    #[error("admission threshold must be within 0-100 (got {0})")]
    InvalidThreshold(f64),
}

/// The six scoring dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    WorkerImpact,
    Timeliness,
    Verifiability,
    Regional,
    Conflict,
    Novelty,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Self::WorkerImpact,
        Self::Timeliness,
        Self::Verifiability,
        Self::Regional,
        Self::Conflict,
        Self::Novelty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkerImpact => "worker_impact",
            Self::Timeliness => "timeliness",
            Self::Verifiability => "verifiability",
            Self::Regional => "regional",
            Self::Conflict => "conflict",
            Self::Novelty => "novelty",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a scorer may read about a candidate
#[derive(Debug, Clone)]
pub struct ScoreInput<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Unix timestamp milliseconds
    pub event_date_ms: Option<i64>,
    pub keywords: &'a [String],
    /// Reference time for recency (Unix timestamp milliseconds)
    pub now_ms: i64,
    /// Titles of recently approved events, for novelty
    pub recent_events: &'a [String],
}

impl<'a> ScoreInput<'a> {
    /// Input with no date, keywords, or history
    pub fn new(title: &'a str, description: &'a str) -> Self {
        Self {
            title,
            description,
            event_date_ms: None,
            keywords: &[],
            now_ms: 0,
            recent_events: &[],
        }
    }

    pub fn from_candidate(candidate: &'a Candidate, now_ms: i64, recent_events: &'a [String]) -> Self {
        Self {
            title: &candidate.title,
            description: &candidate.description,
            event_date_ms: candidate.event_date_ms,
            keywords: &candidate.keywords,
            now_ms,
            recent_events,
        }
    }

    pub fn with_event_date(mut self, event_date_ms: i64, now_ms: i64) -> Self {
        self.event_date_ms = Some(event_date_ms);
        self.now_ms = now_ms;
        self
    }

    pub fn with_keywords(mut self, keywords: &'a [String]) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_recent_events(mut self, recent_events: &'a [String]) -> Self {
        self.recent_events = recent_events;
        self
    }

    /// Title and description joined
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    pub fn match_text(&self) -> MatchText {
        MatchText::new(&self.text())
    }

    /// Whole days between the event and `now_ms`; negative for future events
    pub fn days_since_event(&self) -> Option<f64> {
        self.event_date_ms
            .map(|event| (self.now_ms - event) as f64 / MS_PER_DAY)
    }
}

/// One contribution to a dimension score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub label: String,
    pub delta: f64,
}

/// Explanation of a single dimension score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionBreakdown {
    pub dimension: Dimension,
    /// Clamped to 0-10
    pub score: f64,
    /// Sum of factors before clamping
    pub raw: f64,
    pub factors: Vec<Factor>,
}

/// Capability interface implemented once per dimension
pub trait Scorer: Send + Sync {
    fn dimension(&self) -> Dimension;

    /// Score with the factors that produced it
    fn explain(&self, input: &ScoreInput<'_>) -> DimensionBreakdown;

    /// Clamped 0-10 score
    fn score(&self, input: &ScoreInput<'_>) -> f64 {
        self.explain(input).score
    }
}

/// Running sum of labelled factors
#[derive(Debug, Default)]
pub(crate) struct Tally {
    factors: Vec<Factor>,
}

impl Tally {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, label: impl Into<String>, delta: f64) {
        if delta != 0.0 {
            self.factors.push(Factor {
                label: label.into(),
                delta,
            });
        }
    }

    pub(crate) fn total(&self) -> f64 {
        self.factors.iter().map(|f| f.delta).sum()
    }

    pub(crate) fn finish(self, dimension: Dimension) -> DimensionBreakdown {
        let raw = self.total();
        DimensionBreakdown {
            dimension,
            score: clamp_score(raw),
            raw,
            factors: self.factors,
        }
    }
}

/// Clamp to the 0-10 dimension range
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_DIMENSION_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_out_of_range_and_nan() {
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(12.5), 10.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(4.2), 4.2);
    }

    #[test]
    fn tally_skips_zero_deltas() {
        let mut t = Tally::new();
        t.add("base", 5.0);
        t.add("nothing", 0.0);
        t.add("bonus", 7.0);
        let b = t.finish(Dimension::Novelty);
        assert_eq!(b.factors.len(), 2);
        assert_eq!(b.raw, 12.0);
        assert_eq!(b.score, 10.0);
    }

    #[test]
    fn days_since_event() {
        let input = ScoreInput::new("t", "d").with_event_date(0, 2 * 86_400_000);
        assert_eq!(input.days_since_event(), Some(2.0));
        assert_eq!(ScoreInput::new("t", "d").days_since_event(), None);
    }
}
