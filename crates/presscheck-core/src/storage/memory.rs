//! In-memory storage backend
//!
//! A simple HashMap-based implementation for testing and development.
//! Not suitable for production use due to lack of persistence.

use std::collections::HashMap;

use crate::model::{Candidate, CandidateStatus, Topic, VerificationStatus};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::traits::{CandidateLookup, CandidateStore, TopicStore};

/// In-memory candidate and topic store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    candidates: HashMap<String, Candidate>,
    topics: HashMap<String, Topic>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store with initial candidates.
    ///
    /// Fails on the first duplicate ID.
    pub fn with_candidates(candidates: Vec<Candidate>) -> StoreResult<Self> {
        let mut store = Self::new();
        for candidate in candidates {
            store.insert_candidate(&candidate)?;
        }
        Ok(store)
    }

    /// All topics (for testing).
    pub fn topics(&self) -> &HashMap<String, Topic> {
        &self.topics
    }

    fn sorted_candidates(&self, keep: impl Fn(&Candidate) -> bool) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = self.candidates.values().filter(|c| keep(c)).cloned().collect();
        out.sort_by(|a, b| {
            a.discovered_at_ms
                .cmp(&b.discovered_at_ms)
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }
}

impl CandidateStore for MemoryStore {
    fn insert_candidate(&mut self, candidate: &Candidate) -> StoreResult<()> {
        if self.candidates.contains_key(&candidate.id) {
            return Err(StoreError::AlreadyExists(candidate.id.clone()));
        }
        self.candidates
            .insert(candidate.id.clone(), candidate.clone());
        Ok(())
    }

    fn insert_promoted(&mut self, candidate: &Candidate, topic: &Topic) -> StoreResult<()> {
        if self.candidates.contains_key(&candidate.id) {
            return Err(StoreError::AlreadyExists(candidate.id.clone()));
        }
        if self.topics.contains_key(&topic.id) {
            return Err(StoreError::AlreadyExists(topic.id.clone()));
        }
        self.candidates
            .insert(candidate.id.clone(), candidate.clone());
        self.topics.insert(topic.id.clone(), topic.clone());
        Ok(())
    }

    fn get_candidate(&self, id: &str) -> StoreResult<Option<Candidate>> {
        Ok(self.candidates.get(id).cloned())
    }

    fn update_candidate(&mut self, candidate: &Candidate) -> StoreResult<()> {
        let stored = self
            .candidates
            .get_mut(&candidate.id)
            .ok_or_else(|| StoreError::NotFound(candidate.id.clone()))?;
        stored.status = candidate.status;
        stored.scores = candidate.scores.clone();
        Ok(())
    }

    fn candidates_by_status(&self, status: CandidateStatus) -> StoreResult<Vec<Candidate>> {
        Ok(self.sorted_candidates(|c| c.status == status))
    }

    fn candidates_since(&self, since_ms: i64) -> StoreResult<Vec<Candidate>> {
        Ok(self.sorted_candidates(|c| c.discovered_at_ms >= since_ms))
    }

    fn candidate_count(&self) -> StoreResult<usize> {
        Ok(self.candidates.len())
    }
}

impl CandidateLookup for MemoryStore {
    fn url_seen_since(&self, url: &str, since_ms: i64) -> StoreResult<bool> {
        Ok(self
            .candidates
            .values()
            .any(|c| c.source_url == url && c.discovered_at_ms >= since_ms))
    }

    fn titles_since(&self, since_ms: i64) -> StoreResult<Vec<String>> {
        Ok(self
            .sorted_candidates(|c| c.discovered_at_ms >= since_ms)
            .into_iter()
            .map(|c| c.title)
            .collect())
    }
}

impl TopicStore for MemoryStore {
    fn insert_topic(&mut self, topic: &Topic) -> StoreResult<()> {
        if self.topics.contains_key(&topic.id) {
            return Err(StoreError::AlreadyExists(topic.id.clone()));
        }
        self.topics.insert(topic.id.clone(), topic.clone());
        Ok(())
    }

    fn get_topic(&self, id: &str) -> StoreResult<Option<Topic>> {
        Ok(self.topics.get(id).cloned())
    }

    fn topics_by_status(&self, status: VerificationStatus) -> StoreResult<Vec<Topic>> {
        let mut out: Vec<Topic> = self
            .topics
            .values()
            .filter(|t| t.verification_status == status)
            .cloned()
            .collect();
        out.sort_by(|a, b| {
            a.created_at_ms
                .cmp(&b.created_at_ms)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(out)
    }

    fn update_verification(&mut self, topic: &Topic, expected_version: u64) -> StoreResult<()> {
        let stored = self
            .topics
            .get_mut(&topic.id)
            .ok_or_else(|| StoreError::NotFound(topic.id.clone()))?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict {
                id: topic.id.clone(),
                expected: expected_version,
                found: stored.version,
            });
        }
        stored.verification_status = topic.verification_status;
        stored.source_count = topic.source_count;
        stored.academic_citation_count = topic.academic_citation_count;
        stored.verified_facts = topic.verified_facts.clone();
        stored.source_plan = topic.source_plan.clone();
        stored.confidence_pct = topic.confidence_pct;
        stored.agreement_score = topic.agreement_score;
        stored.version = topic.version;
        stored.updated_at_ms = topic.updated_at_ms;
        Ok(())
    }
}
