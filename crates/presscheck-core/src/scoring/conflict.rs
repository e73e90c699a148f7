//! Conflict: tension between parties across six keyword families

use super::lexicon::ConflictLexicon;
use super::{Dimension, DimensionBreakdown, ScoreInput, Scorer, Tally};

const EXTRA_HIT_BONUS: f64 = 0.5;
const MAX_EXTRA_PER_FAMILY: f64 = 1.0;
const CO_OCCURRENCE_BONUS: f64 = 2.0;
const CO_OCCURRENCE_FAMILIES: usize = 3;
const RESOLUTION_PENALTY: f64 = -2.0;
const MAX_RESOLUTION_HITS: usize = 2;

pub struct ConflictScorer {
    lexicon: ConflictLexicon,
}

impl ConflictScorer {
    pub fn new(lexicon: ConflictLexicon) -> Self {
        Self { lexicon }
    }
}

impl Default for ConflictScorer {
    fn default() -> Self {
        Self::new(ConflictLexicon::default())
    }
}

impl Scorer for ConflictScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Conflict
    }

    fn explain(&self, input: &ScoreInput<'_>) -> DimensionBreakdown {
        let text = input.match_text();
        let mut tally = Tally::new();
        let mut families_present = 0;

        for family in &self.lexicon.families {
            let hits = text.hits(&family.terms);
            if hits.is_empty() {
                continue;
            }
            families_present += 1;
            let extra = ((hits.len() - 1) as f64 * EXTRA_HIT_BONUS).min(MAX_EXTRA_PER_FAMILY);
            tally.add(
                format!("{} ({})", family.name, hits.join(", ")),
                family.weight + extra,
            );
        }

        if families_present >= CO_OCCURRENCE_FAMILIES {
            tally.add(
                format!("{} families co-occur", families_present),
                CO_OCCURRENCE_BONUS,
            );
        }

        for term in text
            .hits(&self.lexicon.resolution)
            .into_iter()
            .take(MAX_RESOLUTION_HITS)
        {
            tally.add(format!("resolution '{}'", term), RESOLUTION_PENALTY);
        }

        tally.finish(Dimension::Conflict)
    }
}
