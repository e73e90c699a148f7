//! Claims extracted from topic and source text

use serde::{Deserialize, Serialize};

/// Evidentiary strength of a claim.
///
/// Ordering is resolution precedence: when signals disagree the greater
/// variant wins (`Interpreted > Claimed > Observed`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// Directly measured or documented fact
    Observed = 0,
    /// Attributed to a party ("union officials said")
    #[default]
    Claimed = 1,
    /// Analysis, prediction or evaluation
    Interpreted = 2,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Observed => "observed",
            Self::Claimed => "claimed",
            Self::Interpreted => "interpreted",
        }
    }
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Corroboration confidence for a single claim
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ClaimConfidence {
    #[default]
    Low,
    Medium,
    High,
}

impl ClaimConfidence {
    /// Fixed contribution to the agreement score
    pub fn score(&self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.6,
            Self::Low => 0.3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for ClaimConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An atomic factual assertion and its corroboration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    #[serde(default)]
    pub claim_type: ClaimType,
    /// Names of sources that corroborate the claim
    #[serde(default)]
    pub supporting_sources: Vec<String>,
    /// Names of sources reporting divergent figures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_sources: Vec<String>,
    #[serde(default)]
    pub confidence: ClaimConfidence,
    /// Supporting sources / sources examined
    #[serde(default)]
    pub support_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_note: Option<String>,
}

impl Claim {
    /// A claim with no corroboration yet
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            claim_type: ClaimType::default(),
            supporting_sources: Vec::new(),
            conflicting_sources: Vec::new(),
            confidence: ClaimConfidence::Low,
            support_ratio: 0.0,
            conflict_note: None,
        }
    }

    pub fn is_conflicting(&self) -> bool {
        self.conflict_note.is_some()
    }
}
