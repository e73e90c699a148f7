//! Evidentiary classification of claims: observed, claimed, or interpreted
//!
//! Two kinds of signal feed the label:
//!
//! - a source prior from the strongest supporting source (government records
//!   and court filings are observed; academic work is observed unless the
//!   claim is interpretive; news is claimed unless interpretive)
//! - linguistic cues in the claim itself (attribution means claimed; modal,
//!   hedging or evaluative language means interpreted; measurement language
//!   without attribution means observed)
//!
//! When signals disagree the label with the highest precedence wins:
//! interpreted, then claimed, then observed. No signal at all means claimed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::crossref::SourceText;
use crate::model::{Claim, ClaimType, SourceType};
use crate::text::{numeric_tokens, MatchText};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Cue terms for each evidentiary class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactLexicon {
    pub attribution: Vec<String>,
    pub interpretive: Vec<String>,
    pub evaluative: Vec<String>,
    pub measurement: Vec<String>,
}

impl Default for FactLexicon {
    fn default() -> Self {
        Self {
            attribution: strings(&[
                "said", "says", "according to", "claimed", "claims", "alleged", "alleges",
                "told", "stated", "announced", "argued", "contends", "insisted", "spokesperson",
            ]),
            interpretive: strings(&[
                "could", "may", "might", "likely", "unlikely", "expected to", "suggests",
                "appears", "seems", "would", "should", "predict", "forecast", "indicates",
                "signals", "sign of", "probably", "possibly", "analysts believe",
            ]),
            evaluative: strings(&[
                "significant", "dramatic", "historic", "landmark", "controversial", "unfair",
                "devastating", "outrageous", "crucial", "remarkable", "alarming",
            ]),
            measurement: strings(&[
                "percent", "voted", "counted", "measured", "recorded", "filed", "tally",
                "ballots", "data show", "figures show", "statistics", "survey", "ruled",
            ]),
        }
    }
}

/// Why a claim received its label
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub claim_type: ClaimType,
    pub source_prior: Option<ClaimType>,
    pub cues: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FactClassifier {
    lexicon: FactLexicon,
}

impl FactClassifier {
    pub fn new(lexicon: FactLexicon) -> Self {
        Self { lexicon }
    }

    /// Label a claim from its text and the types of its supporting sources
    pub fn explain(&self, text: &str, supporting: &[SourceType]) -> Classification {
        let matcher = MatchText::new(text);
        let attribution = matcher.hits(&self.lexicon.attribution);
        let interpretive = matcher.hits(&self.lexicon.interpretive);
        let evaluative = matcher.hits(&self.lexicon.evaluative);
        let measurement = matcher.hits(&self.lexicon.measurement);
        let is_interpretive = !interpretive.is_empty() || !evaluative.is_empty();

        let mut signals = Vec::new();
        let mut cues = Vec::new();

        let source_prior = supporting
            .iter()
            .map(|t| Self::prior(*t, is_interpretive))
            .min();
        signals.extend(source_prior);

        if !attribution.is_empty() {
            signals.push(ClaimType::Claimed);
            cues.extend(attribution.iter().map(|t| format!("attribution '{}'", t)));
        }
        if is_interpretive {
            signals.push(ClaimType::Interpreted);
            cues.extend(
                interpretive
                    .iter()
                    .chain(&evaluative)
                    .map(|t| format!("interpretive '{}'", t)),
            );
        }
        let measured = !measurement.is_empty() || !numeric_tokens(text).is_empty();
        if measured && attribution.is_empty() {
            signals.push(ClaimType::Observed);
            cues.push("measurement without attribution".to_string());
        }

        Classification {
            claim_type: signals.into_iter().max().unwrap_or_default(),
            source_prior,
            cues,
        }
    }

    /// Label every claim in place, looking supporting sources up by name
    pub fn classify(&self, claims: &mut [Claim], sources: &[SourceText]) {
        let types: HashMap<&str, SourceType> = sources
            .iter()
            .map(|s| (s.name.as_str(), s.source_type))
            .collect();
        for claim in claims.iter_mut() {
            let supporting: Vec<SourceType> = claim
                .supporting_sources
                .iter()
                .filter_map(|name| types.get(name.as_str()).copied())
                .collect();
            claim.claim_type = self.explain(&claim.text, &supporting).claim_type;
        }
    }

    /// Evidentiary prior a single source type lends a claim
    fn prior(source_type: SourceType, interpretive: bool) -> ClaimType {
        match source_type {
            SourceType::GovernmentDocument | SourceType::CourtFiling => ClaimType::Observed,
            SourceType::Academic if interpretive => ClaimType::Interpreted,
            SourceType::Academic => ClaimType::Observed,
            _ if interpretive => ClaimType::Interpreted,
            _ => ClaimType::Claimed,
        }
    }
}

/// Share of claims labelled observed (0 with no claims)
pub fn observed_share(claims: &[Claim]) -> f64 {
    if claims.is_empty() {
        return 0.0;
    }
    let observed = claims
        .iter()
        .filter(|c| c.claim_type == ClaimType::Observed)
        .count();
    observed as f64 / claims.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str, supporting: &[SourceType]) -> ClaimType {
        FactClassifier::default().explain(text, supporting).claim_type
    }

    #[test]
    fn no_signal_defaults_to_claimed() {
        assert_eq!(label("Workers gathered outside the gates", &[]), ClaimType::Claimed);
    }

    #[test]
    fn official_records_are_observed() {
        assert_eq!(
            label("The election petition lists the bargaining unit", &[SourceType::GovernmentDocument]),
            ClaimType::Observed
        );
    }

    #[test]
    fn measurement_without_attribution_is_observed() {
        assert_eq!(label("Workers voted 2654 to 2131", &[]), ClaimType::Observed);
    }

    #[test]
    fn attribution_outranks_observation() {
        assert_eq!(
            label("The union said 500 workers joined", &[SourceType::CourtFiling]),
            ClaimType::Claimed
        );
    }

    #[test]
    fn interpretation_outranks_everything() {
        assert_eq!(
            label(
                "Analysts said the vote could spread to other warehouses",
                &[SourceType::GovernmentDocument]
            ),
            ClaimType::Interpreted
        );
        assert_eq!(
            label("A landmark ruling for gig workers", &[SourceType::Academic]),
            ClaimType::Interpreted
        );
    }

    #[test]
    fn news_prior_is_claimed() {
        assert_eq!(
            label("Managers held meetings with staff", &[SourceType::News]),
            ClaimType::Claimed
        );
    }

    #[test]
    fn strongest_source_sets_the_prior() {
        let c = FactClassifier::default()
            .explain("The contract covers nurses", &[SourceType::News, SourceType::Academic]);
        assert_eq!(c.source_prior, Some(ClaimType::Observed));
        assert_eq!(c.claim_type, ClaimType::Observed);
    }

    #[test]
    fn classify_looks_up_source_types() {
        let mut claims = vec![Claim::new("The filing lists the bargaining unit")];
        claims[0].supporting_sources.push("NLRB".into());
        FactClassifier::default().classify(
            &mut claims,
            &[SourceText::new("NLRB", SourceType::GovernmentDocument, "petition text")],
        );
        assert_eq!(claims[0].claim_type, ClaimType::Observed);
        assert_eq!(observed_share(&claims), 1.0);
    }
}
