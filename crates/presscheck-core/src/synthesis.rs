//! Verification level, confidence, and attribution plan for a topic
//!
//! The level rule is a pure function of two counts:
//!
//! - **certified**: at least 6 credible (tier 1-2) sources, or at least 3
//!   academic citations
//! - **verified**: at least 1 credible source
//! - **unverified**: otherwise
//!
//! Raising either count never lowers the level. Publication always
//! proceeds; an unverified topic only carries a reader-facing caveat.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credibility::{CredibilityCheck, CredibilityRanker};
use crate::crossref::CrossReferenceResult;
use crate::facts::observed_share;
use crate::model::{Claim, CredibilityTier, RankedSource, SourceType, Topic, VerificationStatus};

pub const CERTIFIED_CREDIBLE_SOURCES: usize = 6;
pub const CERTIFIED_ACADEMIC_CITATIONS: usize = 3;
pub const VERIFIED_CREDIBLE_SOURCES: usize = 1;

const AGREEMENT_WEIGHT: f64 = 15.0;
const OBSERVED_WEIGHT: f64 = 5.0;

pub const UNVERIFIED_CAVEAT: &str = "This story could not be independently confirmed by \
credible sources. Claims are attributed to the parties and outlets that made them.";

/// A source chosen for attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSource {
    pub name: String,
    pub url: String,
    pub source_type: SourceType,
    pub credibility_score: u8,
    #[serde(default)]
    pub academic: bool,
}

/// Which sources to cite and how to lead.
///
/// Primary holds tier-1 sources and supporting holds tier-2 sources, both in
/// rank order, so the credible-source and academic counts can be recovered
/// from a stored plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionPlan {
    pub primary: Vec<PlannedSource>,
    pub supporting: Vec<PlannedSource>,
    pub lead_strategy: String,
}

impl AttributionPlan {
    pub fn credible_sources(&self) -> usize {
        self.primary.len() + self.supporting.len()
    }

    pub fn academic_citations(&self) -> usize {
        self.primary.iter().filter(|s| s.academic).count()
    }

    /// Level implied by the plan alone
    pub fn level(&self) -> VerificationStatus {
        determine_level(self.credible_sources(), self.academic_citations())
    }
}

/// Everything written back to a topic after a verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub level: VerificationStatus,
    pub confidence_pct: u8,
    pub credible_sources: usize,
    pub academic_citations: usize,
    pub agreement_score: f64,
    pub claims: Vec<Claim>,
    pub plan: AttributionPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveat: Option<String>,
}

/// Level from credible-source and academic-citation counts
pub fn determine_level(credible_sources: usize, academic_citations: usize) -> VerificationStatus {
    if credible_sources >= CERTIFIED_CREDIBLE_SOURCES
        || academic_citations >= CERTIFIED_ACADEMIC_CITATIONS
    {
        VerificationStatus::Certified
    } else if credible_sources >= VERIFIED_CREDIBLE_SOURCES {
        VerificationStatus::Verified
    } else {
        VerificationStatus::Unverified
    }
}

fn level_base(level: VerificationStatus) -> f64 {
    match level {
        VerificationStatus::Unverified => 25.0,
        VerificationStatus::Verified => 55.0,
        VerificationStatus::Certified => 80.0,
    }
}

/// Confidence percentage: level base, plus agreement and observed share
pub fn confidence_pct(level: VerificationStatus, agreement: f64, observed_share: f64) -> u8 {
    let agreement = agreement.clamp(0.0, 1.0);
    let observed_share = observed_share.clamp(0.0, 1.0);
    let pct = level_base(level) + agreement * AGREEMENT_WEIGHT + observed_share * OBSERVED_WEIGHT;
    pct.round().min(100.0) as u8
}

/// Split credible sources into primary and supporting and pick a lead
pub fn attribution_plan(ranked: &[RankedSource], ranker: &CredibilityRanker) -> AttributionPlan {
    let planned = |s: &RankedSource| PlannedSource {
        name: s.name.clone(),
        url: s.url.clone(),
        source_type: s.source_type,
        credibility_score: s.credibility_score,
        academic: ranker.is_academic(s.source_type, &s.url),
    };
    let primary: Vec<PlannedSource> = ranked
        .iter()
        .filter(|s| s.credibility_tier == CredibilityTier::Primary)
        .map(planned)
        .collect();
    let supporting: Vec<PlannedSource> = ranked
        .iter()
        .filter(|s| s.credibility_tier == CredibilityTier::Established)
        .map(planned)
        .collect();

    let lead_strategy = match (primary.first(), supporting.first()) {
        (Some(lead), _) => format!(
            "Lead with {} ({}); corroborate with {} supporting source(s)",
            lead.name,
            lead.source_type,
            supporting.len() + primary.len() - 1
        ),
        (None, Some(lead)) => format!(
            "Lead with {} ({}); no primary documents found, attribute figures to reporting",
            lead.name, lead.source_type
        ),
        (None, None) => {
            "No credible sources; attribute every claim to its originator".to_string()
        }
    };

    AttributionPlan {
        primary,
        supporting,
        lead_strategy,
    }
}

/// Combine ranking and cross-referencing into a verification outcome
pub fn synthesize(
    ranked: &[RankedSource],
    ranker: &CredibilityRanker,
    crossref: CrossReferenceResult,
) -> VerificationOutcome {
    let check: CredibilityCheck = ranker.check(ranked);
    let plan = attribution_plan(ranked, ranker);
    let level = determine_level(check.credible_sources, check.academic_citations);
    let confidence = confidence_pct(level, crossref.agreement_score, observed_share(&crossref.claims));

    VerificationOutcome {
        level,
        confidence_pct: confidence,
        credible_sources: check.credible_sources,
        academic_citations: check.academic_citations,
        agreement_score: crossref.agreement_score,
        claims: crossref.claims,
        plan,
        caveat: (level == VerificationStatus::Unverified).then(|| UNVERIFIED_CAVEAT.to_string()),
    }
}

/// Write an outcome to a topic and bump its version.
///
/// This is the only place verification fields of a topic change.
pub fn apply_outcome(
    topic: &mut Topic,
    outcome: &VerificationOutcome,
    now_ms: i64,
) -> Result<(), serde_json::Error> {
    let facts = serde_json::to_string(&outcome.claims)?;
    let plan = serde_json::to_string(&outcome.plan)?;

    topic.verification_status = outcome.level;
    topic.source_count = outcome.credible_sources;
    topic.academic_citation_count = outcome.academic_citations;
    topic.verified_facts = facts;
    topic.source_plan = plan;
    topic.confidence_pct = outcome.confidence_pct;
    topic.agreement_score = outcome.agreement_score;
    topic.version += 1;
    topic.updated_at_ms = now_ms;

    info!(
        "Topic {} {} at {}% confidence ({} credible, {} academic)",
        topic.id,
        outcome.level,
        outcome.confidence_pct,
        outcome.credible_sources,
        outcome.academic_citations
    );
    Ok(())
}
