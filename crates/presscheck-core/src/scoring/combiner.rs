//! Fixed-weight combination of the six dimension scores

use serde::{Deserialize, Serialize};

use super::{
    ConflictScorer, Dimension, DimensionBreakdown, Lexicons, NoveltyScorer, RegionalScorer,
    ScoreInput, Scorer, ScoringError, TimelinessScorer, VerifiabilityScorer, WorkerImpactScorer,
    MAX_DIMENSION_SCORE,
};

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Per-dimension weights; must sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub worker_impact: f64,
    pub timeliness: f64,
    pub verifiability: f64,
    pub regional: f64,
    pub conflict: f64,
    pub novelty: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            worker_impact: 0.30,
            timeliness: 0.15,
            verifiability: 0.15,
            regional: 0.15,
            conflict: 0.15,
            novelty: 0.10,
        }
    }
}

impl Weights {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::WorkerImpact => self.worker_impact,
            Dimension::Timeliness => self.timeliness,
            Dimension::Verifiability => self.verifiability,
            Dimension::Regional => self.regional,
            Dimension::Conflict => self.conflict,
            Dimension::Novelty => self.novelty,
        }
    }

    pub fn sum(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.get(*d)).sum()
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        let sum = self.sum();
        let negative = Dimension::ALL.iter().any(|d| self.get(*d) < 0.0);
        if negative || (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScoringError::InvalidWeights(sum));
        }
        Ok(())
    }
}

/// Scorer configuration: weights, admission threshold, and lexicons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: Weights,
    /// Combined score (0-100) a candidate must reach to be approved
    pub admission_threshold: f64,
    pub lexicons: Lexicons,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            admission_threshold: 65.0,
            lexicons: Lexicons::default(),
        }
    }
}

/// Per-candidate score breakdown, as shown on operator dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub worker_impact: f64,
    pub timeliness: f64,
    pub verifiability: f64,
    pub regional: f64,
    pub conflict: f64,
    pub novelty: f64,
    /// Weighted combination, 0-100
    pub combined: f64,
    pub admitted: bool,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::WorkerImpact => self.worker_impact,
            Dimension::Timeliness => self.timeliness,
            Dimension::Verifiability => self.verifiability,
            Dimension::Regional => self.regional,
            Dimension::Conflict => self.conflict,
            Dimension::Novelty => self.novelty,
        }
    }
}

/// The six dimension scorers composed under fixed weights
pub struct CombinedScorer {
    scorers: Vec<Box<dyn Scorer>>,
    weights: Weights,
    admission_threshold: f64,
}

impl CombinedScorer {
    /// Build the standard six scorers from configuration.
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        let lexicons = config.lexicons;
        let scorers: Vec<Box<dyn Scorer>> = vec![
            Box::new(WorkerImpactScorer::new(lexicons.worker_impact)),
            Box::new(TimelinessScorer::new(lexicons.timeliness)),
            Box::new(VerifiabilityScorer::new(lexicons.verifiability)),
            Box::new(RegionalScorer::new(lexicons.regional)),
            Box::new(ConflictScorer::new(lexicons.conflict)),
            Box::new(NoveltyScorer::new(lexicons.novelty)),
        ];
        Self::with_scorers(scorers, config.weights, config.admission_threshold)
    }

    /// Compose arbitrary scorer implementations (one per dimension).
    pub fn with_scorers(
        scorers: Vec<Box<dyn Scorer>>,
        weights: Weights,
        admission_threshold: f64,
    ) -> Result<Self, ScoringError> {
        weights.validate()?;
        if !(0.0..=100.0).contains(&admission_threshold) {
            return Err(ScoringError::InvalidThreshold(admission_threshold));
        }
        Ok(Self {
            scorers,
            weights,
            admission_threshold,
        })
    }

    pub fn admission_threshold(&self) -> f64 {
        self.admission_threshold
    }

    /// Dimension-by-dimension explanations
    pub fn explain(&self, input: &ScoreInput<'_>) -> Vec<DimensionBreakdown> {
        self.scorers.iter().map(|s| s.explain(input)).collect()
    }

    /// Score all dimensions and decide admission
    pub fn evaluate(&self, input: &ScoreInput<'_>) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown {
            worker_impact: 0.0,
            timeliness: 0.0,
            verifiability: 0.0,
            regional: 0.0,
            conflict: 0.0,
            novelty: 0.0,
            combined: 0.0,
            admitted: false,
        };

        let mut weighted = 0.0;
        for scorer in &self.scorers {
            let score = scorer.score(input);
            let dimension = scorer.dimension();
            weighted += score * self.weights.get(dimension);
            match dimension {
                Dimension::WorkerImpact => breakdown.worker_impact = score,
                Dimension::Timeliness => breakdown.timeliness = score,
                Dimension::Verifiability => breakdown.verifiability = score,
                Dimension::Regional => breakdown.regional = score,
                Dimension::Conflict => breakdown.conflict = score,
                Dimension::Novelty => breakdown.novelty = score,
            }
        }

        // Weights sum to 1, so the weighted mean is 0-10; rescale to 0-100
        let combined = (weighted * (100.0 / MAX_DIMENSION_SCORE)).clamp(0.0, 100.0);
        breakdown.combined = (combined * 100.0).round() / 100.0;
        breakdown.admitted = breakdown.combined >= self.admission_threshold;
        breakdown
    }
}

impl Default for CombinedScorer {
    fn default() -> Self {
        Self {
            scorers: vec![
                Box::new(WorkerImpactScorer::default()),
                Box::new(TimelinessScorer::default()),
                Box::new(VerifiabilityScorer::default()),
                Box::new(RegionalScorer::default()),
                Box::new(ConflictScorer::default()),
                Box::new(NoveltyScorer::default()),
            ],
            weights: Weights::default(),
            admission_threshold: ScoringConfig::default().admission_threshold,
        }
    }
}
