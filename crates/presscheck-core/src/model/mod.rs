//! Record types shared by every stage
//!
//! Topics own their claims and ranked sources as plain values; there are no
//! back-references between records.

mod candidate;
mod claim;
pub mod ids;
mod source;
mod topic;

use thiserror::Error;

pub use candidate::{parse_event_date, Candidate, CandidateBuilder, CandidateStatus, RawCandidate};
pub use claim::{Claim, ClaimConfidence, ClaimType};
pub use source::{CredibilityTier, RankedSource, SourceRecord, SourceType};
pub use topic::{Topic, VerificationStatus};

/// Contract violations on record types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Credibility tier outside 1-4
    #[error("credibility tier out of range: {0} (expected 1-4)")]
    InvalidTier(u8),

    /// Illegal candidate lifecycle step
    #[error("candidate {id}: illegal status transition {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: CandidateStatus,
        to: CandidateStatus,
    },

    /// Unrecognized status label
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}
