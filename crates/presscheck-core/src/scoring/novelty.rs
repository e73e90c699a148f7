//! Novelty: first-of-kind events versus routine or already-covered ones

use super::lexicon::NoveltyLexicon;
use super::{Dimension, DimensionBreakdown, ScoreInput, Scorer, Tally};
use crate::text::{jaccard, keywords};

const BASE: f64 = 5.0;
const FIRST_OF_KIND_BONUS: f64 = 1.5;
const MAX_FIRST_OF_KIND: f64 = 4.0;
const ROUTINE_PENALTY: f64 = -1.0;
const MAX_ROUTINE: f64 = -3.0;
/// Only words this long take part in similarity
const SIMILARITY_MIN_WORD_LEN: usize = 4;

/// Similarity thresholds and their penalties, strongest first
const SIMILARITY_PENALTIES: &[(f64, f64)] = &[(0.7, -5.0), (0.5, -3.0), (0.3, -1.5)];

pub struct NoveltyScorer {
    lexicon: NoveltyLexicon,
}

impl NoveltyScorer {
    pub fn new(lexicon: NoveltyLexicon) -> Self {
        Self { lexicon }
    }

    /// Highest keyword Jaccard similarity against recently approved events
    pub fn max_similarity(text: &str, recent_events: &[String]) -> f64 {
        let own = keywords(text, SIMILARITY_MIN_WORD_LEN);
        if own.is_empty() {
            return 0.0;
        }
        recent_events
            .iter()
            .map(|event| jaccard(&own, &keywords(event, SIMILARITY_MIN_WORD_LEN)))
            .fold(0.0, f64::max)
    }

    fn similarity_penalty(similarity: f64) -> f64 {
        SIMILARITY_PENALTIES
            .iter()
            .find(|(threshold, _)| similarity >= *threshold)
            .map(|(_, penalty)| *penalty)
            .unwrap_or(0.0)
    }
}

impl Default for NoveltyScorer {
    fn default() -> Self {
        Self::new(NoveltyLexicon::default())
    }
}

impl Scorer for NoveltyScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Novelty
    }

    fn explain(&self, input: &ScoreInput<'_>) -> DimensionBreakdown {
        let text = input.match_text();
        let mut tally = Tally::new();
        tally.add("base", BASE);

        let firsts = text.hits(&self.lexicon.first_of_kind);
        if !firsts.is_empty() {
            tally.add(
                format!("first-of-kind ({})", firsts.join(", ")),
                (firsts.len() as f64 * FIRST_OF_KIND_BONUS).min(MAX_FIRST_OF_KIND),
            );
        }

        let routine = text.hits(&self.lexicon.routine);
        if !routine.is_empty() {
            tally.add(
                format!("routine ({})", routine.join(", ")),
                (routine.len() as f64 * ROUTINE_PENALTY).max(MAX_ROUTINE),
            );
        }

        let similarity = Self::max_similarity(&input.text(), input.recent_events);
        tally.add(
            format!("similar to recent coverage ({:.2})", similarity),
            Self::similarity_penalty(similarity),
        );

        tally.finish(Dimension::Novelty)
    }
}
