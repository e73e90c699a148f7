//! Topics: admitted candidates undergoing verification

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use super::claim::Claim;
use super::ids::topic_id;
use super::ModelError;
use crate::synthesis::AttributionPlan;

/// Tri-state verification level attached to a published piece.
///
/// Ordered from weakest to strongest so that monotonicity can be checked
/// with plain comparisons.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Verified,
    Certified,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Verified => "verified",
            Self::Certified => "certified",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unverified" => Ok(Self::Unverified),
            "verified" => Ok(Self::Verified),
            "certified" => Ok(Self::Certified),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// Promoted form of an approved candidate.
///
/// Verification fields are written only by
/// [`crate::synthesis::apply_outcome`]; every other component treats them as
/// read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// TPID: TP + 16 hex chars derived from the candidate ID
    pub id: String,
    pub candidate_id: String,
    pub title: String,
    pub description: String,
    pub verification_status: VerificationStatus,
    /// Tier 1 and 2 sources
    pub source_count: usize,
    pub academic_citation_count: usize,
    /// JSON array of [`Claim`]
    pub verified_facts: String,
    /// JSON-encoded [`AttributionPlan`]
    pub source_plan: String,
    /// 0-100
    #[serde(default)]
    pub confidence_pct: u8,
    /// Mean claim confidence, 0-1
    #[serde(default)]
    pub agreement_score: f64,
    /// Optimistic-lock counter, bumped on every verification write
    #[serde(default)]
    pub version: u64,
    /// Unix timestamp milliseconds
    #[serde(default)]
    pub created_at_ms: i64,
    #[serde(default)]
    pub updated_at_ms: i64,
}

impl Topic {
    /// Promote an approved candidate. Starts unverified with empty facts.
    pub fn from_candidate(candidate: &Candidate, now_ms: i64) -> Self {
        Self {
            id: topic_id(&candidate.id),
            candidate_id: candidate.id.clone(),
            title: candidate.title.clone(),
            description: candidate.description.clone(),
            verification_status: VerificationStatus::Unverified,
            source_count: 0,
            academic_citation_count: 0,
            verified_facts: "[]".to_string(),
            source_plan: "{}".to_string(),
            confidence_pct: 0,
            agreement_score: 0.0,
            version: 0,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }

    /// Decode the serialized fact list
    pub fn facts(&self) -> Result<Vec<Claim>, serde_json::Error> {
        serde_json::from_str(&self.verified_facts)
    }

    /// Decode the serialized attribution plan; `None` before the first run
    pub fn plan(&self) -> Result<Option<AttributionPlan>, serde_json::Error> {
        if self.source_plan.trim() == "{}" || self.source_plan.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&self.source_plan).map(Some)
    }

    /// Title plus description, the text claims are extracted from
    pub fn full_text(&self) -> String {
        format!("{}. {}", self.title.trim_end_matches('.'), self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CandidateBuilder;

    #[test]
    fn status_ordering() {
        assert!(VerificationStatus::Certified > VerificationStatus::Verified);
        assert!(VerificationStatus::Verified > VerificationStatus::Unverified);
    }

    #[test]
    fn promotion_starts_unverified() {
        let candidate = CandidateBuilder::new()
            .title("Teachers strike in Chicago")
            .description("The union called the strike after talks failed.")
            .url("https://example.com/ctu")
            .build();
        let topic = Topic::from_candidate(&candidate, 1_000);

        assert_eq!(topic.candidate_id, candidate.id);
        assert_eq!(topic.verification_status, VerificationStatus::Unverified);
        assert_eq!(topic.version, 0);
        assert!(topic.facts().unwrap().is_empty());
        assert!(topic.plan().unwrap().is_none());
    }

    #[test]
    fn status_parse() {
        assert_eq!(
            "Certified".parse::<VerificationStatus>().unwrap(),
            VerificationStatus::Certified
        );
        assert!("pending".parse::<VerificationStatus>().is_err());
    }
}
