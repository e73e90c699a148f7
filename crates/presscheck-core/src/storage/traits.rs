//! Storage trait definitions

use crate::model::{Candidate, CandidateStatus, Topic, VerificationStatus};
use crate::storage::error::StoreResult;

/// Persistence for discovered candidates.
///
/// Candidates are never deleted by the core; they only move through their
/// lifecycle.
pub trait CandidateStore {
    /// Store a new candidate.
    ///
    /// If a candidate with the same ID already exists, returns `StoreError::AlreadyExists`.
    fn insert_candidate(&mut self, candidate: &Candidate) -> StoreResult<()>;

    /// Store a promoted candidate together with its topic.
    ///
    /// Both records are written or neither is. An ID already present in
    /// either table fails with `StoreError::AlreadyExists`.
    fn insert_promoted(&mut self, candidate: &Candidate, topic: &Topic) -> StoreResult<()>;

    /// Retrieve a candidate by ID.
    fn get_candidate(&self, id: &str) -> StoreResult<Option<Candidate>>;

    /// Overwrite status and scores of an existing candidate.
    ///
    /// Returns `StoreError::NotFound` if the candidate doesn't exist.
    fn update_candidate(&mut self, candidate: &Candidate) -> StoreResult<()>;

    /// Candidates with the given status, oldest first.
    fn candidates_by_status(&self, status: CandidateStatus) -> StoreResult<Vec<Candidate>>;

    /// Candidates discovered at or after `since_ms`, oldest first.
    fn candidates_since(&self, since_ms: i64) -> StoreResult<Vec<Candidate>>;

    /// Total number of stored candidates.
    fn candidate_count(&self) -> StoreResult<usize>;
}

/// Read-only view the deduplicator needs of previously seen candidates.
///
/// Calls block. A backend that can stall must bound each call with its own
/// timeout and report expiry as an error; the deduplicator treats any error
/// as "not seen" and carries on.
pub trait CandidateLookup {
    /// Whether a candidate with this URL was discovered at or after `since_ms`.
    fn url_seen_since(&self, url: &str, since_ms: i64) -> StoreResult<bool>;

    /// Titles of candidates discovered at or after `since_ms`.
    fn titles_since(&self, since_ms: i64) -> StoreResult<Vec<String>>;
}

/// Persistence for topics.
pub trait TopicStore {
    /// Store a freshly promoted topic.
    fn insert_topic(&mut self, topic: &Topic) -> StoreResult<()>;

    /// Retrieve a topic by ID.
    fn get_topic(&self, id: &str) -> StoreResult<Option<Topic>>;

    /// Topics with the given verification status, oldest first.
    fn topics_by_status(&self, status: VerificationStatus) -> StoreResult<Vec<Topic>>;

    /// Write the verification fields of `topic`.
    ///
    /// The write succeeds only if the stored version still equals
    /// `expected_version`; otherwise returns `StoreError::VersionConflict` and
    /// leaves the stored topic untouched.
    fn update_verification(&mut self, topic: &Topic, expected_version: u64) -> StoreResult<()>;
}
