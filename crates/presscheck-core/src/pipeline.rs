//! Batch orchestration
//!
//! [`Evaluator`] runs the admission half: deduplicate, score, gate, and
//! promote approved candidates to topics. [`VerificationRun`] runs the
//! verification half for stored topics: search, rank, cross-reference,
//! classify, synthesize, and write back under a version guard.
//!
//! A failure inside one candidate or topic degrades only that item; batch
//! calls report per-item outcomes. A candidate is persisted in a single
//! store call after every lifecycle step has succeeded, so a failed
//! candidate leaves nothing behind.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AdmissionBand, PipelineConfig};
use crate::credibility::{CredibilityError, CredibilityRanker};
use crate::crossref::{extract_claims, CrossReferencer, SourceText};
use crate::dedup::{Deduplicator, Dropped};
use crate::facts::FactClassifier;
use crate::model::{
    Candidate, CandidateStatus, ModelError, SourceRecord, Topic, VerificationStatus,
};
use crate::scoring::{CombinedScorer, ScoreInput, ScoringError};
use crate::storage::{CandidateLookup, CandidateStore, StoreError, StoreResult, TopicStore};
use crate::synthesis::{apply_outcome, synthesize, VerificationOutcome};

const MS_PER_DAY: i64 = 86_400_000;

/// Everything the pipeline persists to
pub trait Store: CandidateStore + CandidateLookup + TopicStore {}

impl<T: CandidateStore + CandidateLookup + TopicStore> Store for T {}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Credibility(#[from] CredibilityError),

    #[error("failed to encode verification payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("candidate {id} arrived as {status}, only discovered candidates are evaluated")]
    NotDiscovered { id: String, status: CandidateStatus },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Search failure reported by a [`SourceSearch`] implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("source search timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    #[error("source search failed: {0}")]
    Failed(String),
}

/// Source-identification collaborator.
///
/// `search` is a blocking call. Implementations that reach the network must
/// bound it with their own timeout and return [`SearchError::Timeout`] when
/// it expires; the pipeline never waits on a search indefinitely. Any error
/// is treated as "no sources found".
pub trait SourceSearch {
    fn search(&self, topic: &Topic) -> Result<Vec<SourceRecord>, SearchError>;
}

/// A fixed source list, returned for every topic
#[derive(Debug, Clone, Default)]
pub struct FixedSources(pub Vec<SourceRecord>);

impl SourceSearch for FixedSources {
    fn search(&self, _topic: &Topic) -> Result<Vec<SourceRecord>, SearchError> {
        Ok(self.0.clone())
    }
}

/// A candidate or topic that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub id: String,
    pub error: String,
}

/// Outcome of an evaluation batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Scored candidates with their final status
    pub scored: Vec<Candidate>,
    /// Topics created for approved candidates
    pub topics: Vec<Topic>,
    pub dropped: Vec<Dropped>,
    pub failures: Vec<ItemFailure>,
}

impl EvaluationReport {
    pub fn approved(&self) -> usize {
        self.topics.len()
    }

    /// Approved share of scored candidates (0 when nothing was scored)
    pub fn admission_rate(&self) -> f64 {
        if self.scored.is_empty() {
            return 0.0;
        }
        self.approved() as f64 / self.scored.len() as f64
    }
}

/// Deduplicates, scores, and admits candidates.
pub struct Evaluator {
    dedup: Deduplicator,
    scorer: CombinedScorer,
    band: AdmissionBand,
    recent_event_days: u32,
}

impl Evaluator {
    pub fn new(config: &PipelineConfig) -> PipelineResult<Self> {
        Ok(Self {
            dedup: Deduplicator::new(config.dedup.clone()),
            scorer: CombinedScorer::new(config.scoring.clone())?,
            band: config.admission_band,
            recent_event_days: config.recent_event_days,
        })
    }

    pub fn scorer(&self) -> &CombinedScorer {
        &self.scorer
    }

    /// Run one batch through dedup, scoring, and the admission gate.
    pub fn evaluate_batch<S: Store>(
        &mut self,
        store: &mut S,
        batch: Vec<Candidate>,
        now_ms: i64,
    ) -> EvaluationReport {
        // Only fresh discoveries enter the lifecycle; nothing else is written
        let (batch, not_discovered): (Vec<Candidate>, Vec<Candidate>) = batch
            .into_iter()
            .partition(|c| c.status == CandidateStatus::Discovered);
        let failures: Vec<ItemFailure> = not_discovered
            .into_iter()
            .map(|c| {
                let e = PipelineError::NotDiscovered {
                    id: c.id.clone(),
                    status: c.status,
                };
                warn!("Skipping candidate {}: {}", c.id, e);
                ItemFailure {
                    id: c.id,
                    error: e.to_string(),
                }
            })
            .collect();

        let dedup = self.dedup.filter(batch, Some(&*store), now_ms);
        let mut recent_events = self.recent_events(store, now_ms);
        let mut report = EvaluationReport {
            dropped: dedup.dropped,
            failures,
            ..EvaluationReport::default()
        };

        for candidate in dedup.admitted {
            match self.evaluate_one(store, &candidate, &recent_events, now_ms) {
                Ok((candidate, topic)) => {
                    if let Some(topic) = topic {
                        recent_events.push(topic.title.clone());
                        report.topics.push(topic);
                    }
                    report.scored.push(candidate);
                }
                Err(e) => {
                    warn!("Candidate {} failed evaluation: {}", candidate.id, e);
                    self.dedup.forget(&candidate);
                    report.failures.push(ItemFailure {
                        id: candidate.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        self.log_admission_rate(&report);
        report
    }

    fn evaluate_one<S: Store>(
        &self,
        store: &mut S,
        candidate: &Candidate,
        recent_events: &[String],
        now_ms: i64,
    ) -> PipelineResult<(Candidate, Option<Topic>)> {
        let mut candidate = candidate.clone();
        let breakdown = self
            .scorer
            .evaluate(&ScoreInput::from_candidate(&candidate, now_ms, recent_events));
        candidate.transition(CandidateStatus::Evaluated)?;
        let admitted = breakdown.admitted;
        debug!(
            "Scored {} '{}': {:.2} ({})",
            candidate.id,
            candidate.title,
            breakdown.combined,
            if admitted { "approved" } else { "rejected" }
        );
        candidate.scores = Some(breakdown);

        if !admitted {
            candidate.transition(CandidateStatus::Rejected)?;
            store.insert_candidate(&candidate)?;
            return Ok((candidate, None));
        }

        candidate.transition(CandidateStatus::Approved)?;
        let topic = Topic::from_candidate(&candidate, now_ms);
        candidate.transition(CandidateStatus::Converted)?;
        store.insert_promoted(&candidate, &topic)?;
        Ok((candidate, Some(topic)))
    }

    /// Titles of recently approved candidates; empty on lookup failure
    fn recent_events<S: Store>(&self, store: &S, now_ms: i64) -> Vec<String> {
        let since_ms = now_ms - i64::from(self.recent_event_days) * MS_PER_DAY;
        match store.candidates_since(since_ms) {
            Ok(candidates) => candidates
                .into_iter()
                .filter(|c| {
                    matches!(
                        c.status,
                        CandidateStatus::Approved | CandidateStatus::Converted
                    )
                })
                .map(|c| c.title)
                .collect(),
            Err(e) => {
                warn!("Recent event lookup failed, novelty sees no history: {}", e);
                Vec::new()
            }
        }
    }

    fn log_admission_rate(&self, report: &EvaluationReport) {
        let rate = report.admission_rate();
        info!(
            "Evaluated {} candidates: {} approved ({:.1}%), {} dropped, {} failed",
            report.scored.len(),
            report.approved(),
            rate * 100.0,
            report.dropped.len(),
            report.failures.len()
        );
        if !report.scored.is_empty() && !self.band.contains(rate) {
            warn!(
                "Admission rate {:.1}% outside expected band {:.0}-{:.0}%",
                rate * 100.0,
                self.band.min_rate * 100.0,
                self.band.max_rate * 100.0
            );
        }
    }
}

/// Verification result for one topic in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicResult {
    pub topic_id: String,
    pub level: VerificationStatus,
    pub confidence_pct: u8,
}

/// Outcome of verifying every pending topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub verified: Vec<TopicResult>,
    pub failures: Vec<ItemFailure>,
}

impl VerificationReport {
    pub fn count(&self, level: VerificationStatus) -> usize {
        self.verified.iter().filter(|r| r.level == level).count()
    }
}

/// Verifies stored topics against a source-search collaborator.
pub struct VerificationRun<Q> {
    search: Q,
    ranker: CredibilityRanker,
    crossref: CrossReferencer,
    classifier: FactClassifier,
}

impl<Q: SourceSearch> VerificationRun<Q> {
    pub fn new(config: &PipelineConfig, search: Q) -> PipelineResult<Self> {
        Ok(Self {
            search,
            ranker: CredibilityRanker::new(config.domains.clone())?,
            crossref: CrossReferencer::new(config.cross_reference),
            classifier: FactClassifier::new(config.facts.clone()),
        })
    }

    pub fn ranker(&self) -> &CredibilityRanker {
        &self.ranker
    }

    /// Verification outcome for a topic and its sources, without persisting
    pub fn evaluate(&self, topic: &Topic, sources: &[SourceRecord]) -> VerificationOutcome {
        let ranked = self.ranker.rank(sources);
        let texts: Vec<SourceText> = sources.iter().map(SourceText::from).collect();
        let claims = extract_claims(&topic.full_text());
        let mut result = self.crossref.verify(&claims, &texts);
        self.classifier.classify(&mut result.claims, &texts);
        synthesize(&ranked, &self.ranker, result)
    }

    /// Search, verify, and persist one topic.
    ///
    /// If another run wrote the topic in between, the topic is re-read and
    /// the outcome re-applied once before giving up.
    pub fn verify_topic<S: TopicStore>(
        &self,
        store: &mut S,
        topic_id: &str,
        now_ms: i64,
    ) -> PipelineResult<VerificationOutcome> {
        let topic = store
            .get_topic(topic_id)?
            .ok_or_else(|| PipelineError::TopicNotFound(topic_id.to_string()))?;

        let sources = match self.search.search(&topic) {
            Ok(sources) => sources,
            Err(e) => {
                warn!("Source search for {} failed, continuing with none: {}", topic.id, e);
                Vec::new()
            }
        };
        debug!("Topic {}: {} sources found", topic.id, sources.len());

        let outcome = self.evaluate(&topic, &sources);
        match write_outcome(store, topic, &outcome, now_ms) {
            Err(PipelineError::Store(StoreError::VersionConflict { .. })) => {
                debug!("Topic {} changed during verification, retrying write", topic_id);
                let fresh = store
                    .get_topic(topic_id)?
                    .ok_or_else(|| PipelineError::TopicNotFound(topic_id.to_string()))?;
                write_outcome(store, fresh, &outcome, now_ms)?;
            }
            other => other?,
        }
        Ok(outcome)
    }

    /// Verify every unverified topic, isolating failures per topic.
    pub fn verify_pending<S: TopicStore>(
        &self,
        store: &mut S,
        now_ms: i64,
    ) -> StoreResult<VerificationReport> {
        let pending = store.topics_by_status(VerificationStatus::Unverified)?;
        let mut report = VerificationReport::default();

        for topic in pending {
            match self.verify_topic(store, &topic.id, now_ms) {
                Ok(outcome) => report.verified.push(TopicResult {
                    topic_id: topic.id,
                    level: outcome.level,
                    confidence_pct: outcome.confidence_pct,
                }),
                Err(e) => {
                    warn!("Topic {} failed verification: {}", topic.id, e);
                    report.failures.push(ItemFailure {
                        id: topic.id,
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Verified {} topics: {} certified, {} verified, {} unverified, {} failed",
            report.verified.len(),
            report.count(VerificationStatus::Certified),
            report.count(VerificationStatus::Verified),
            report.count(VerificationStatus::Unverified),
            report.failures.len()
        );
        Ok(report)
    }
}

fn write_outcome<S: TopicStore>(
    store: &mut S,
    mut topic: Topic,
    outcome: &VerificationOutcome,
    now_ms: i64,
) -> PipelineResult<()> {
    let expected = topic.version;
    apply_outcome(&mut topic, outcome, now_ms)?;
    store.update_verification(&topic, expected)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CandidateBuilder, RawCandidate, SourceType};
    use crate::storage::MemoryStore;

    const NOW: i64 = 1_700_000_000_000;

    fn strike_candidate() -> Candidate {
        CandidateBuilder::new()
            .title("Amazon workers in NYC vote to unionize")
            .description(
                "Warehouse workers at the Staten Island facility voted 2654-2131 to join \
                 the Amazon Labor Union (ALU), the first successful union election at an \
                 Amazon facility in the US, according to NLRB records.",
            )
            .url("https://example.com/alu")
            .event_date_ms(NOW - MS_PER_DAY / 2)
            .discovered_at_ms(NOW)
            .build()
    }

    fn quiet_candidate() -> Candidate {
        CandidateBuilder::new()
            .title("Library extends weekend hours")
            .description("The branch will open an hour later on Saturdays.")
            .url("https://example.com/library")
            .discovered_at_ms(NOW)
            .build()
    }

    fn sources() -> Vec<SourceRecord> {
        vec![
            SourceRecord::new(
                "NLRB",
                "https://www.nlrb.gov/case/29-RC-288020",
                SourceType::GovernmentDocument,
                "Tally of ballots: 2654 votes for the Amazon Labor Union and 2131 against.",
            ),
            SourceRecord::new(
                "AP",
                "https://apnews.com/article/amazon-union",
                SourceType::WireService,
                "Warehouse workers on Staten Island voted 2654-2131 to join the Amazon Labor Union.",
            ),
            SourceRecord::new(
                "Reddit",
                "https://reddit.com/r/antiwork/1",
                SourceType::Social,
                "huge news from staten island",
            ),
        ]
    }

    struct FailingSearch;

    impl SourceSearch for FailingSearch {
        fn search(&self, _topic: &Topic) -> Result<Vec<SourceRecord>, SearchError> {
            Err(SearchError::Failed("upstream returned 502".into()))
        }
    }

    /// Bumps the stored version behind the caller's back before the first write
    struct RacingStore {
        inner: MemoryStore,
        raced: bool,
    }

    impl TopicStore for RacingStore {
        fn insert_topic(&mut self, topic: &Topic) -> StoreResult<()> {
            self.inner.insert_topic(topic)
        }

        fn get_topic(&self, id: &str) -> StoreResult<Option<Topic>> {
            self.inner.get_topic(id)
        }

        fn topics_by_status(&self, status: VerificationStatus) -> StoreResult<Vec<Topic>> {
            self.inner.topics_by_status(status)
        }

        fn update_verification(&mut self, topic: &Topic, expected: u64) -> StoreResult<()> {
            if !self.raced {
                self.raced = true;
                let mut other = self
                    .inner
                    .get_topic(&topic.id)?
                    .ok_or_else(|| StoreError::NotFound(topic.id.clone()))?;
                let current = other.version;
                other.version += 1;
                self.inner.update_verification(&other, current)?;
            }
            self.inner.update_verification(topic, expected)
        }
    }

    #[test]
    fn evaluate_batch_promotes_approved_candidates() {
        let mut store = MemoryStore::new();
        let mut evaluator = Evaluator::new(&PipelineConfig::default()).unwrap();
        let report = evaluator.evaluate_batch(
            &mut store,
            vec![strike_candidate(), quiet_candidate(), strike_candidate()],
            NOW,
        );

        assert_eq!(report.scored.len(), 2);
        assert_eq!(report.dropped.len(), 1);
        assert!(report.failures.is_empty());
        assert_eq!(report.topics.len(), 1);

        let strike = &report.scored[0];
        assert_eq!(strike.status, CandidateStatus::Converted);
        let scores = strike.scores.as_ref().unwrap();
        assert!(scores.worker_impact >= 7.0);
        assert!(scores.regional >= 8.0);
        assert!(scores.admitted);

        let quiet = &report.scored[1];
        assert_eq!(quiet.status, CandidateStatus::Rejected);

        let stored = store.get_candidate(&strike.id).unwrap().unwrap();
        assert_eq!(stored.status, CandidateStatus::Converted);
        assert_eq!(
            store
                .topics_by_status(VerificationStatus::Unverified)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(report.admission_rate(), 0.5);
    }

    #[test]
    fn second_batch_dedupes_against_store() {
        let mut store = MemoryStore::new();
        let config = PipelineConfig::default();
        Evaluator::new(&config)
            .unwrap()
            .evaluate_batch(&mut store, vec![strike_candidate()], NOW);

        let report = Evaluator::new(&config).unwrap().evaluate_batch(
            &mut store,
            vec![strike_candidate()],
            NOW + 1_000,
        );
        assert!(report.scored.is_empty());
        assert_eq!(report.dropped.len(), 1);
    }

    #[test]
    fn rediscovery_after_window_is_rescored() {
        let mut store = MemoryStore::new();
        let config = PipelineConfig::default();
        let first = Evaluator::new(&config)
            .unwrap()
            .evaluate_batch(&mut store, vec![strike_candidate()], NOW);
        assert_eq!(first.scored.len(), 1);

        let later = NOW + 30 * MS_PER_DAY;
        let rediscovered = CandidateBuilder::new()
            .title(strike_candidate().title)
            .description(strike_candidate().description)
            .url("https://example.com/alu")
            .event_date_ms(later - MS_PER_DAY / 2)
            .discovered_at_ms(later)
            .build();
        let second = Evaluator::new(&config)
            .unwrap()
            .evaluate_batch(&mut store, vec![rediscovered], later);

        assert!(second.failures.is_empty(), "{:?}", second.failures);
        assert!(second.dropped.is_empty());
        assert_eq!(second.scored.len(), 1);
        assert!(second.scored[0].scores.is_some());
        assert_eq!(store.candidate_count().unwrap(), 2);
    }

    #[test]
    fn non_discovered_input_is_refused_without_writes() {
        let mut store = MemoryStore::new();
        let raw = RawCandidate {
            title: "Amazon workers in NYC vote to unionize".into(),
            source_url: "https://example.com/alu".into(),
            status: Some("approved".into()),
            ..Default::default()
        };
        let report = Evaluator::new(&PipelineConfig::default()).unwrap().evaluate_batch(
            &mut store,
            vec![Candidate::from_raw(raw, NOW)],
            NOW,
        );

        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.contains("approved"));
        assert!(report.scored.is_empty());
        assert_eq!(store.candidate_count().unwrap(), 0);
        assert!(store.topics().is_empty());
    }

    #[test]
    fn failed_promotion_leaves_nothing_and_frees_the_title() {
        let mut store = MemoryStore::new();
        let strike = strike_candidate();
        // An existing topic under the same ID makes the promotion fail
        store
            .insert_topic(&Topic::from_candidate(&strike, NOW))
            .unwrap();

        let mut evaluator = Evaluator::new(&PipelineConfig::default()).unwrap();
        let report = evaluator.evaluate_batch(&mut store, vec![strike.clone()], NOW);
        assert_eq!(report.failures.len(), 1);
        assert!(report.scored.is_empty());
        assert!(store.get_candidate(&strike.id).unwrap().is_none());

        let retry = CandidateBuilder::new()
            .title("Amazon workers in NYC vote to unionize!")
            .description(strike.description.clone())
            .url("https://example.com/alu-followup")
            .event_date_ms(NOW - MS_PER_DAY / 2)
            .discovered_at_ms(NOW)
            .build();
        let report = evaluator.evaluate_batch(&mut store, vec![retry], NOW + 1);
        assert!(report.dropped.is_empty());
        assert_eq!(report.scored.len(), 1);
        assert_eq!(report.scored[0].status, CandidateStatus::Converted);
    }

    #[test]
    fn verify_pending_writes_outcomes() {
        let mut store = MemoryStore::new();
        let config = PipelineConfig::default();
        let report = Evaluator::new(&config).unwrap().evaluate_batch(
            &mut store,
            vec![strike_candidate()],
            NOW,
        );
        let topic_id = report.topics[0].id.clone();

        let run = VerificationRun::new(&config, FixedSources(sources())).unwrap();
        let verification = run.verify_pending(&mut store, NOW + 1).unwrap();
        assert_eq!(verification.verified.len(), 1);
        assert_eq!(verification.verified[0].level, VerificationStatus::Verified);

        let topic = store.get_topic(&topic_id).unwrap().unwrap();
        assert_eq!(topic.version, 1);
        assert_eq!(topic.source_count, 2);
        assert_eq!(topic.verification_status, VerificationStatus::Verified);
        assert!(!topic.facts().unwrap().is_empty());
        assert_eq!(topic.plan().unwrap().unwrap().level(), VerificationStatus::Verified);
        assert!(topic.confidence_pct >= 55);
    }

    #[test]
    fn search_failure_degrades_to_unverified() {
        let mut store = MemoryStore::new();
        let topic = Topic::from_candidate(&strike_candidate(), NOW);
        store.insert_topic(&topic).unwrap();

        let run = VerificationRun::new(&PipelineConfig::default(), FailingSearch).unwrap();
        let outcome = run.verify_topic(&mut store, &topic.id, NOW).unwrap();
        assert_eq!(outcome.level, VerificationStatus::Unverified);
        assert!(outcome.caveat.is_some());
        assert_eq!(store.get_topic(&topic.id).unwrap().unwrap().version, 1);
    }

    #[test]
    fn search_timeout_degrades_to_unverified() {
        struct SlowSearch;

        impl SourceSearch for SlowSearch {
            fn search(&self, _topic: &Topic) -> Result<Vec<SourceRecord>, SearchError> {
                Err(SearchError::Timeout { after_ms: 10_000 })
            }
        }

        let mut store = MemoryStore::new();
        let topic = Topic::from_candidate(&strike_candidate(), NOW);
        store.insert_topic(&topic).unwrap();

        let run = VerificationRun::new(&PipelineConfig::default(), SlowSearch).unwrap();
        let outcome = run.verify_topic(&mut store, &topic.id, NOW).unwrap();
        assert_eq!(outcome.level, VerificationStatus::Unverified);
        assert_eq!(
            store.get_topic(&topic.id).unwrap().unwrap().verification_status,
            VerificationStatus::Unverified
        );
    }

    #[test]
    fn missing_topic_is_reported() {
        let mut store = MemoryStore::new();
        let run = VerificationRun::new(&PipelineConfig::default(), FixedSources::default()).unwrap();
        assert!(matches!(
            run.verify_topic(&mut store, "TP-missing", NOW),
            Err(PipelineError::TopicNotFound(_))
        ));
    }

    #[test]
    fn concurrent_write_is_retried_once() {
        let mut store = RacingStore {
            inner: MemoryStore::new(),
            raced: false,
        };
        let topic = Topic::from_candidate(&strike_candidate(), NOW);
        store.insert_topic(&topic).unwrap();

        let run = VerificationRun::new(&PipelineConfig::default(), FixedSources(sources())).unwrap();
        let outcome = run.verify_topic(&mut store, &topic.id, NOW).unwrap();

        let stored = store.get_topic(&topic.id).unwrap().unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.verification_status, outcome.level);
    }
}
