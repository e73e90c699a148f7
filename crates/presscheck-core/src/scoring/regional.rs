//! Regional relevance: how many people live where the event happened

use super::lexicon::RegionalLexicon;
use super::{Dimension, DimensionBreakdown, ScoreInput, Scorer, Tally, MAX_DIMENSION_SCORE};

const DESCRIPTOR_BONUS: f64 = 1.0;
/// Local content with no recognized place still has some reach
const LOCAL_FLOOR: f64 = 1.0;

pub struct RegionalScorer {
    lexicon: RegionalLexicon,
}

impl RegionalScorer {
    pub fn new(lexicon: RegionalLexicon) -> Self {
        Self { lexicon }
    }

    fn national_reason(&self, input: &ScoreInput<'_>) -> Option<String> {
        let flag = self.lexicon.national_flag.to_lowercase();
        if input.keywords.iter().any(|k| k.trim().to_lowercase() == flag) {
            return Some("flagged national".to_string());
        }
        input
            .match_text()
            .hits(&self.lexicon.national_terms)
            .first()
            .map(|term| format!("national term '{}'", term))
    }
}

impl Default for RegionalScorer {
    fn default() -> Self {
        Self::new(RegionalLexicon::default())
    }
}

impl Scorer for RegionalScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Regional
    }

    fn explain(&self, input: &ScoreInput<'_>) -> DimensionBreakdown {
        let mut tally = Tally::new();

        if let Some(reason) = self.national_reason(input) {
            tally.add(reason, MAX_DIMENSION_SCORE);
            return tally.finish(Dimension::Regional);
        }

        let text = input.match_text();
        for place in self.lexicon.metros.iter().chain(&self.lexicon.states) {
            if text.contains(&place.term) {
                tally.add(format!("place '{}'", place.term), place.weight);
            }
        }
        for term in text.hits(&self.lexicon.regional_descriptors) {
            tally.add(format!("regional descriptor '{}'", term), DESCRIPTOR_BONUS);
        }

        if tally.total() <= 0.0 {
            tally.add("local floor", LOCAL_FLOOR);
        }

        tally.finish(Dimension::Regional)
    }
}
