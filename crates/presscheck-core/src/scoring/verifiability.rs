//! Verifiability: how checkable the signal is before any source search

use super::lexicon::VerifiabilityLexicon;
use super::{Dimension, DimensionBreakdown, ScoreInput, Scorer, Tally};
use crate::text::{date_tokens, named_entity_count, numeric_tokens};

const BASE: f64 = 3.0;
const WIRE_BONUS: f64 = 3.0;
const REGIONAL_OUTLET_BONUS: f64 = 2.0;
const SOCIAL_POST_BONUS: f64 = 0.5;
const SPECIFICITY_BONUS: f64 = 1.0;
const CITATION_BONUS: f64 = 1.0;
const MAX_CITATIONS: usize = 2;
const HEDGE_PENALTY: f64 = -1.5;
const MAX_HEDGES: usize = 3;
/// Capitalized mid-sentence words needed to count as naming entities
const MIN_NAMED_ENTITIES: usize = 2;

pub struct VerifiabilityScorer {
    lexicon: VerifiabilityLexicon,
}

impl VerifiabilityScorer {
    pub fn new(lexicon: VerifiabilityLexicon) -> Self {
        Self { lexicon }
    }
}

impl Default for VerifiabilityScorer {
    fn default() -> Self {
        Self::new(VerifiabilityLexicon::default())
    }
}

impl Scorer for VerifiabilityScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Verifiability
    }

    fn explain(&self, input: &ScoreInput<'_>) -> DimensionBreakdown {
        let text = input.match_text();
        let raw = input.text();
        let mut tally = Tally::new();
        tally.add("base", BASE);

        // Only the strongest outlet tier counts
        let outlet = [
            (&self.lexicon.wire_services, WIRE_BONUS, "wire service"),
            (&self.lexicon.regional_outlets, REGIONAL_OUTLET_BONUS, "regional outlet"),
            (&self.lexicon.social_posts, SOCIAL_POST_BONUS, "social post"),
        ]
        .into_iter()
        .find_map(|(terms, bonus, label)| {
            text.hits(terms)
                .first()
                .map(|term| (format!("{} '{}'", label, term), bonus))
        });
        if let Some((label, bonus)) = outlet {
            tally.add(label, bonus);
        }

        if named_entity_count(&raw) >= MIN_NAMED_ENTITIES {
            tally.add("named entities", SPECIFICITY_BONUS);
        }
        if !date_tokens(&raw).is_empty() {
            tally.add("dates", SPECIFICITY_BONUS);
        }
        if !numeric_tokens(&raw).is_empty() {
            tally.add("figures", SPECIFICITY_BONUS);
        }
        if raw.contains(['"', '\u{201c}', '\u{201d}']) {
            tally.add("direct quotes", SPECIFICITY_BONUS);
        }

        for term in text.hits(&self.lexicon.citations).into_iter().take(MAX_CITATIONS) {
            tally.add(format!("citation '{}'", term), CITATION_BONUS);
        }
        for term in text.hits(&self.lexicon.hedging).into_iter().take(MAX_HEDGES) {
            tally.add(format!("hedging '{}'", term), HEDGE_PENALTY);
        }

        tally.finish(Dimension::Verifiability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(title: &str, description: &str) -> f64 {
        VerifiabilityScorer::default().score(&ScoreInput::new(title, description))
    }

    #[test]
    fn bare_claim_scores_base() {
        assert_eq!(score("workers upset", "things are bad"), 3.0);
    }

    #[test]
    fn wire_outranks_social() {
        let wire = score("workers upset", "reported by reuters");
        let social = score("workers upset", "seen in a viral tweet");
        assert_eq!(wire, 6.0);
        assert_eq!(social, 3.5);
    }

    #[test]
    fn only_strongest_outlet_counts() {
        assert_eq!(score("workers upset", "reuters picked up a viral tweet"), 6.0);
    }

    #[test]
    fn specificity_signals_add() {
        let s = score(
            "Union files charges",
            "On March 5 the Amazon Labor Union said \"2,654 members voted\", according to records.",
        );
        // base 3 + entities + dates + figures + quote + one citation
        assert_eq!(s, 8.0);
    }

    #[test]
    fn attribution_without_quote_marks_is_not_a_quote() {
        let said = score("workers upset", "the union said talks failed");
        let quoted = score("workers upset", "the union said \u{201c}talks failed\u{201d}");
        assert_eq!(said, 3.0);
        assert_eq!(quoted, 4.0);
    }

    #[test]
    fn hedging_subtracts() {
        let s = score("workers upset", "allegedly, unnamed managers reportedly cut hours");
        assert_eq!(s, 0.0);
    }
}
