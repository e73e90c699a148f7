//! PressCheck Core Engine
//!
//! Evaluation and verification for labor-news candidates: deduplication,
//! six-dimension newsworthiness scoring with an admission gate, source
//! credibility ranking, claim cross-referencing, evidentiary classification
//! and verification synthesis.
//!
//! # Features
//!
//! - `parallel` - Fan out per-source and per-claim work via rayon
//!
//! # Example
//!
//! ```rust
//! use presscheck_core::model::CandidateBuilder;
//! use presscheck_core::scoring::{CombinedScorer, ScoreInput};
//!
//! let candidate = CandidateBuilder::new()
//!     .title("Warehouse workers vote to unionize")
//!     .url("https://example.com/vote")
//!     .build();
//!
//! let scorer = CombinedScorer::default();
//! let breakdown = scorer.evaluate(&ScoreInput::from_candidate(&candidate, 0, &[]));
//! assert!(breakdown.combined >= 0.0 && breakdown.combined <= 100.0);
//! ```

pub mod config;
pub mod credibility;
pub mod crossref;
pub mod dedup;
pub mod facts;
pub mod model;
pub mod pipeline;
pub mod scoring;
pub mod storage;
pub mod synthesis;
pub mod text;

// Re-export main types at crate root
pub use config::{AdmissionBand, PipelineConfig};
pub use credibility::{ranking_summary, CredibilityCheck, CredibilityRanker, DomainLists};
pub use crossref::{extract_claims, CrossReferenceResult, CrossReferencer, SourceText};
pub use dedup::{DedupConfig, DedupReport, Deduplicator, DuplicateReason, SharedDeduplicator};
pub use facts::{FactClassifier, FactLexicon};
pub use model::{
    Candidate, CandidateBuilder, CandidateStatus, Claim, ClaimConfidence, ClaimType,
    CredibilityTier, RankedSource, RawCandidate, SourceRecord, SourceType, Topic,
    VerificationStatus,
};
pub use pipeline::{
    EvaluationReport, Evaluator, FixedSources, PipelineError, SearchError, SourceSearch,
    VerificationReport, VerificationRun,
};
pub use scoring::{CombinedScorer, ScoreBreakdown, ScoringConfig, Weights};
pub use storage::{CandidateLookup, CandidateStore, MemoryStore, StoreError, TopicStore};
pub use synthesis::{AttributionPlan, VerificationOutcome};
