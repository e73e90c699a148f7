//! Worker Impact: how directly the event touches working people

use super::lexicon::WorkerImpactLexicon;
use super::{Dimension, DimensionBreakdown, ScoreInput, Scorer, Tally};
use crate::text::{counts_before, dollar_amounts};

const HIGH_IMPACT_WEIGHT: f64 = 3.0;
const MEDIUM_IMPACT_WEIGHT: f64 = 1.5;
const SECTOR_BONUS: f64 = 1.5;
const MAX_SECTORS_COUNTED: usize = 2;
const WAGE_AMOUNT_BONUS: f64 = 1.5;

pub struct WorkerImpactScorer {
    lexicon: WorkerImpactLexicon,
}

impl WorkerImpactScorer {
    pub fn new(lexicon: WorkerImpactLexicon) -> Self {
        Self { lexicon }
    }

    /// Bonus for the largest head count mentioned; nothing above 10,000 counts extra
    fn head_count_bonus(count: u64) -> f64 {
        match count {
            0..=9 => 0.0,
            10..=99 => 0.5,
            100..=999 => 1.0,
            1_000..=9_999 => 1.5,
            _ => 2.0,
        }
    }
}

impl Default for WorkerImpactScorer {
    fn default() -> Self {
        Self::new(WorkerImpactLexicon::default())
    }
}

impl Scorer for WorkerImpactScorer {
    fn dimension(&self) -> Dimension {
        Dimension::WorkerImpact
    }

    fn explain(&self, input: &ScoreInput<'_>) -> DimensionBreakdown {
        let text = input.match_text();
        let raw = input.text();
        let mut tally = Tally::new();

        for term in text.hits(&self.lexicon.high_impact) {
            tally.add(format!("high-impact term '{}'", term), HIGH_IMPACT_WEIGHT);
        }
        for term in text.hits(&self.lexicon.medium_impact) {
            tally.add(format!("medium-impact term '{}'", term), MEDIUM_IMPACT_WEIGHT);
        }
        for sector in text
            .hits(&self.lexicon.sectors)
            .into_iter()
            .take(MAX_SECTORS_COUNTED)
        {
            tally.add(format!("sector '{}'", sector), SECTOR_BONUS);
        }

        if !dollar_amounts(&raw).is_empty() && text.any(&self.lexicon.wage_context) {
            tally.add("dollar amount in wage context", WAGE_AMOUNT_BONUS);
        }

        if let Some(max_count) = counts_before(&raw, &self.lexicon.worker_nouns)
            .into_iter()
            .max()
        {
            tally.add(
                format!("{} workers affected", max_count),
                Self::head_count_bonus(max_count),
            );
        }

        tally.finish(Dimension::WorkerImpact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(title: &str, description: &str) -> f64 {
        WorkerImpactScorer::default().score(&ScoreInput::new(title, description))
    }

    #[test]
    fn high_impact_outweighs_medium() {
        let strike = score("Drivers threaten strike", "");
        let wage = score("Drivers discuss wage", "");
        assert!(strike > wage, "strike {} vs wage {}", strike, wage);
    }

    #[test]
    fn unrelated_text_scores_zero() {
        assert_eq!(score("Local bakery wins pie contest", "Judges loved the crust."), 0.0);
    }

    #[test]
    fn dollar_amount_needs_wage_context() {
        let with_context = score("Company update", "Starting pay rises to $18 an hour.");
        let without = score("Company update", "The stadium cost $18 million.");
        assert!(with_context > without);
    }

    #[test]
    fn head_count_bonus_is_capped() {
        assert_eq!(WorkerImpactScorer::head_count_bonus(5), 0.0);
        assert_eq!(WorkerImpactScorer::head_count_bonus(250), 1.0);
        assert_eq!(WorkerImpactScorer::head_count_bonus(10_000), 2.0);
        assert_eq!(WorkerImpactScorer::head_count_bonus(2_000_000), 2.0);
    }

    #[test]
    fn larger_head_counts_score_higher() {
        let small = score("Staff walk off", "About 40 employees left the site.");
        let large = score("Staff walk off", "About 4,000 employees left the site.");
        assert!(large > small);
    }

    #[test]
    fn amazon_union_vote_scores_high() {
        let s = score(
            "Amazon workers in NYC vote to unionize",
            "Workers at the JFK8 warehouse on Staten Island voted 2654-2131 to join the \
             Amazon Labor Union (ALU).",
        );
        assert!(s >= 7.0, "got {}", s);
    }

    #[test]
    fn score_is_clamped() {
        let s = score(
            "Strike! Walkout! Lockout! Picket lines as workers unionize",
            "Wage theft, layoffs, overtime, pensions and benefits at the warehouse and hospital; \
             12,000 workers demand pay of $25 an hour.",
        );
        assert_eq!(s, 10.0);
    }
}
