//! Timeliness: urgency and recency of the event

use super::lexicon::TimelinessLexicon;
use super::{Dimension, DimensionBreakdown, ScoreInput, Scorer, Tally};

const BASE: f64 = 5.0;
const URGENT_BONUS: f64 = 2.0;
const SCHEDULED_EVENT_BONUS: f64 = 2.0;
const SCHEDULING_LANGUAGE_BONUS: f64 = 1.0;
const HISTORICAL_PENALTY: f64 = -2.0;
/// Future events further out than this get no scheduling bonus
const NEAR_FUTURE_DAYS: f64 = 30.0;

pub struct TimelinessScorer {
    lexicon: TimelinessLexicon,
}

impl TimelinessScorer {
    pub fn new(lexicon: TimelinessLexicon) -> Self {
        Self { lexicon }
    }

    /// Banded recency curve over days since the event
    pub fn recency_bonus(days: f64) -> f64 {
        match days {
            d if d <= 1.0 => 4.0,
            d if d <= 3.0 => 3.0,
            d if d <= 7.0 => 2.0,
            d if d <= 14.0 => 1.0,
            d if d <= 30.0 => 0.0,
            d if d <= 90.0 => -1.0,
            d if d <= 180.0 => -2.0,
            _ => -3.0,
        }
    }
}

impl Default for TimelinessScorer {
    fn default() -> Self {
        Self::new(TimelinessLexicon::default())
    }
}

impl Scorer for TimelinessScorer {
    fn dimension(&self) -> Dimension {
        Dimension::Timeliness
    }

    fn explain(&self, input: &ScoreInput<'_>) -> DimensionBreakdown {
        let text = input.match_text();
        let mut tally = Tally::new();
        tally.add("base", BASE);

        if let Some(term) = text.hits(&self.lexicon.urgent).first() {
            tally.add(format!("urgent language '{}'", term), URGENT_BONUS);
        }

        match input.days_since_event() {
            Some(days) if days < 0.0 => {
                if -days <= NEAR_FUTURE_DAYS {
                    tally.add("scheduled within 30 days", SCHEDULED_EVENT_BONUS);
                }
            }
            Some(days) => {
                tally.add(format!("{:.0} days since event", days), Self::recency_bonus(days));
            }
            // Unknown date: neutral recency
            None => {}
        }

        if let Some(term) = text.hits(&self.lexicon.scheduled).first() {
            tally.add(format!("scheduling language '{}'", term), SCHEDULING_LANGUAGE_BONUS);
        }

        if let Some(term) = text.hits(&self.lexicon.historical).first() {
            tally.add(format!("historical framing '{}'", term), HISTORICAL_PENALTY);
        }

        tally.finish(Dimension::Timeliness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400_000;
    const NOW: i64 = 1_704_067_200_000;

    fn score_at(title: &str, days_ago: Option<i64>) -> f64 {
        let mut input = ScoreInput::new(title, "");
        input.now_ms = NOW;
        if let Some(days) = days_ago {
            input = input.with_event_date(NOW - days * DAY, NOW);
        }
        TimelinessScorer::default().score(&input)
    }

    #[test]
    fn missing_date_is_neutral() {
        assert_eq!(score_at("Workers rally", None), 5.0);
    }

    #[test]
    fn recency_curve_bands() {
        assert_eq!(TimelinessScorer::recency_bonus(0.5), 4.0);
        assert_eq!(TimelinessScorer::recency_bonus(2.0), 3.0);
        assert_eq!(TimelinessScorer::recency_bonus(20.0), 0.0);
        assert_eq!(TimelinessScorer::recency_bonus(100.0), -2.0);
        assert_eq!(TimelinessScorer::recency_bonus(400.0), -3.0);
    }

    #[test]
    fn recent_beats_old() {
        assert_eq!(score_at("Workers rally", Some(0)), 9.0);
        assert_eq!(score_at("Workers rally", Some(365)), 2.0);
    }

    #[test]
    fn breaking_language_adds() {
        assert_eq!(score_at("BREAKING: workers rally", None), 7.0);
    }

    #[test]
    fn near_future_event_adds() {
        assert_eq!(score_at("Union vote scheduled", Some(-5)), 8.0);
        assert_eq!(score_at("Union vote", Some(-90)), 5.0);
    }

    #[test]
    fn historical_framing_subtracts() {
        assert_eq!(score_at("Remembering the 1937 sit-down strike", None), 3.0);
    }

    #[test]
    fn stays_in_range() {
        let s = score_at("Breaking: strike happening now, upcoming vote", Some(0));
        assert!((0.0..=10.0).contains(&s));
        assert_eq!(s, 10.0);
    }
}
