//! Cross-referencing claims against source text
//!
//! Each source is reduced to three token sets: numeric figures, date
//! mentions, and stop-word-filtered keywords. A claim is then checked
//! against every source with two independent tests:
//!
//! - **support**: more than half of the claim's keywords appear in the
//!   source, or the source shares a figure or a date plus two keywords
//! - **conflict**: the source is on the same subject (at least two shared
//!   keywords) and reports a figure the claim does not state
//!
//! A source can do both. "450 of the 500 workers voted to strike" supports
//! and conflicts with "500 workers voted to strike".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::model::{Claim, ClaimConfidence, SourceRecord, SourceType};
use crate::text::{date_tokens, keywords, numeric_tokens, sentences, MatchText};

/// Shortest word that counts as a keyword
const KEYWORD_MIN_LEN: usize = 3;
/// Shared keywords that put a source on the same subject as a claim
const MIN_SHARED_KEYWORDS: usize = 2;

const REPORTING_VERBS: &[&str] = &[
    "said", "says", "reported", "announced", "according to", "confirmed", "stated", "told",
    "filed", "voted", "ruled", "found", "claimed", "alleged", "estimated",
];

/// Source text to check claims against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceText {
    pub name: String,
    #[serde(default)]
    pub source_type: SourceType,
    pub text: String,
}

impl SourceText {
    pub fn new(name: impl Into<String>, source_type: SourceType, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type,
            text: text.into(),
        }
    }
}

impl From<&SourceRecord> for SourceText {
    fn from(record: &SourceRecord) -> Self {
        Self::new(record.name.clone(), record.source_type, record.snippet.clone())
    }
}

/// Token sets shared by claims and sources
#[derive(Debug, Clone, Default)]
struct Profile {
    numbers: BTreeSet<String>,
    dates: BTreeSet<String>,
    keywords: BTreeSet<String>,
}

impl Profile {
    fn of(text: &str) -> Self {
        Self {
            numbers: numeric_tokens(text),
            dates: date_tokens(text),
            keywords: keywords(text, KEYWORD_MIN_LEN),
        }
    }

    fn is_empty(&self) -> bool {
        self.numbers.is_empty() && self.dates.is_empty() && self.keywords.is_empty()
    }
}

/// How one source relates to one claim
#[derive(Debug, Clone, Default, PartialEq)]
struct Relation {
    supports: bool,
    /// Figures the source reports that the claim does not; empty unless on subject
    divergent: Vec<String>,
}

/// Claims with corroboration, plus the overall agreement score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossReferenceResult {
    pub claims: Vec<Claim>,
    /// Mean claim confidence score (high 1.0, medium 0.6, low 0.3); 0 with no claims
    pub agreement_score: f64,
}

impl CrossReferenceResult {
    pub fn conflicting_claims(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter().filter(|c| c.is_conflicting())
    }
}

/// Thresholds for support and confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossReferenceConfig {
    /// Share of claim keywords a source must contain to support it (exclusive)
    pub support_similarity: f64,
    /// Support ratio for high confidence (with at least two sources)
    pub high_ratio: f64,
    /// Support ratio for medium confidence
    pub medium_ratio: f64,
}

impl Default for CrossReferenceConfig {
    fn default() -> Self {
        Self {
            support_similarity: 0.5,
            high_ratio: 0.6,
            medium_ratio: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrossReferencer {
    config: CrossReferenceConfig,
}

impl CrossReferencer {
    pub fn new(config: CrossReferenceConfig) -> Self {
        Self { config }
    }

    /// Verify every claim against every source.
    pub fn verify(&self, claims: &[String], sources: &[SourceText]) -> CrossReferenceResult {
        let profiles: Vec<(&SourceText, Profile)> = sources
            .iter()
            .map(|s| (s, Profile::of(&s.text)))
            .filter(|(_, p)| !p.is_empty())
            .collect();

        #[cfg(feature = "parallel")]
        let claims: Vec<Claim> = claims
            .par_iter()
            .map(|text| self.verify_claim(text, &profiles))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let claims: Vec<Claim> = claims
            .iter()
            .map(|text| self.verify_claim(text, &profiles))
            .collect();

        let agreement_score = if claims.is_empty() {
            0.0
        } else {
            claims.iter().map(|c| c.confidence.score()).sum::<f64>() / claims.len() as f64
        };

        CrossReferenceResult {
            claims,
            agreement_score,
        }
    }

    fn verify_claim(&self, text: &str, sources: &[(&SourceText, Profile)]) -> Claim {
        let profile = Profile::of(text);
        let mut claim = Claim::new(text);
        let mut notes = Vec::new();

        for (source, source_profile) in sources {
            let relation = self.relate(&profile, source_profile);
            if relation.supports {
                claim.supporting_sources.push(source.name.clone());
            }
            if !relation.divergent.is_empty() {
                let stated: Vec<&str> = profile.numbers.iter().map(|n| n.as_str()).collect();
                notes.push(format!(
                    "{} reports {} where the claim states {}",
                    source.name,
                    relation.divergent.join(", "),
                    stated.join(", ")
                ));
                claim.conflicting_sources.push(source.name.clone());
            }
        }

        let examined = sources.len();
        claim.support_ratio = if examined == 0 {
            0.0
        } else {
            claim.supporting_sources.len() as f64 / examined as f64
        };
        claim.confidence = self.confidence(claim.support_ratio, claim.supporting_sources.len());
        if !notes.is_empty() {
            claim.conflict_note = Some(notes.join("; "));
        }

        debug!(
            "Claim '{}': {} supporting, {} conflicting, {} confidence",
            claim.text,
            claim.supporting_sources.len(),
            claim.conflicting_sources.len(),
            claim.confidence
        );
        claim
    }

    fn relate(&self, claim: &Profile, source: &Profile) -> Relation {
        let shared_keywords = claim.keywords.intersection(&source.keywords).count();
        let on_subject = shared_keywords >= MIN_SHARED_KEYWORDS;
        let shares_number = claim.numbers.intersection(&source.numbers).next().is_some();
        let shares_date = claim.dates.intersection(&source.dates).next().is_some();

        let similarity = if claim.keywords.is_empty() {
            0.0
        } else {
            shared_keywords as f64 / claim.keywords.len() as f64
        };
        let supports = similarity > self.config.support_similarity
            || (shares_number && on_subject)
            || (shares_date && on_subject);

        // A claim without figures has nothing to diverge from
        let divergent = if on_subject && !claim.numbers.is_empty() {
            source.numbers.difference(&claim.numbers).cloned().collect()
        } else {
            Vec::new()
        };

        Relation {
            supports,
            divergent,
        }
    }

    fn confidence(&self, ratio: f64, supporting: usize) -> ClaimConfidence {
        if ratio >= self.config.high_ratio && supporting >= 2 {
            ClaimConfidence::High
        } else if ratio >= self.config.medium_ratio || supporting >= 2 {
            ClaimConfidence::Medium
        } else {
            ClaimConfidence::Low
        }
    }
}

/// Checkable sentences of `text`: those carrying figures, dates, or a
/// reporting verb. Duplicate sentences are kept once.
pub fn extract_claims(text: &str) -> Vec<String> {
    let verbs: Vec<String> = REPORTING_VERBS.iter().map(|v| v.to_string()).collect();
    let mut seen = BTreeSet::new();
    sentences(text)
        .into_iter()
        .filter(|s| {
            !numeric_tokens(s).is_empty()
                || !date_tokens(s).is_empty()
                || MatchText::new(s).any(&verbs)
        })
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}
