//! Duplicate detection for discovered candidates
//!
//! Two independent filters; a candidate is admitted only if both miss:
//!
//! 1. exact URL match against URLs seen in this run and, optionally, URLs
//!    persisted within a trailing window
//! 2. near-duplicate title: normalized titles are compared first by exact
//!    hash, then by normalized Levenshtein ratio against every title seen so
//!    far (in-run and persisted)
//!
//! Admitted candidates join the seen-sets, so later records in the same batch
//! dedupe against them and the first occurrence wins.

use ahash::AHashSet;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::model::Candidate;
use crate::storage::CandidateLookup;
use crate::text::{normalize_title, title_similarity};

const MS_PER_DAY: i64 = 86_400_000;

/// Deduplication settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Trailing window for persisted lookups
    pub window_days: u32,
    /// Normalized Levenshtein ratio at or above which titles are duplicates
    pub similarity_threshold: f64,
    /// Consult the persisted store in addition to the in-run sets
    pub check_persisted: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            window_days: 7,
            similarity_threshold: 0.80,
            check_persisted: true,
        }
    }
}

/// Why a candidate was dropped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Same origin URL already seen
    Url,
    /// Same title after normalization
    ExactTitle,
    /// Title within edit-distance threshold of one already seen
    SimilarTitle { similarity: f64 },
    /// Malformed record with no title
    MissingTitle,
}

impl std::fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url => write!(f, "duplicate url"),
            Self::ExactTitle => write!(f, "duplicate title"),
            Self::SimilarTitle { similarity } => {
                write!(f, "similar title ({:.2})", similarity)
            }
            Self::MissingTitle => write!(f, "missing title"),
        }
    }
}

/// A candidate removed from the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dropped {
    pub candidate: Candidate,
    pub reason: DuplicateReason,
}

/// Outcome of deduplicating a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupReport {
    pub admitted: Vec<Candidate>,
    pub dropped: Vec<Dropped>,
}

/// Persisted state loaded once per batch
struct PersistedView<'a> {
    lookup: Option<&'a dyn CandidateLookup>,
    since_ms: i64,
    titles: Vec<String>,
    title_set: AHashSet<String>,
}

impl<'a> PersistedView<'a> {
    fn empty() -> Self {
        Self {
            lookup: None,
            since_ms: 0,
            titles: Vec::new(),
            title_set: AHashSet::new(),
        }
    }

    fn load(lookup: &'a dyn CandidateLookup, since_ms: i64) -> Self {
        let titles: Vec<String> = match lookup.titles_since(since_ms) {
            Ok(titles) => titles.iter().map(|t| normalize_title(t)).collect(),
            Err(e) => {
                warn!("Persisted title lookup failed, deduplicating in-run only: {}", e);
                Vec::new()
            }
        };
        let title_set = titles.iter().cloned().collect();
        Self {
            lookup: Some(lookup),
            since_ms,
            titles,
            title_set,
        }
    }

    fn url_seen(&self, url: &str) -> bool {
        let Some(lookup) = self.lookup else {
            return false;
        };
        match lookup.url_seen_since(url, self.since_ms) {
            Ok(seen) => seen,
            Err(e) => {
                // Fail open: a lookup error never drops a candidate
                warn!("Persisted URL lookup failed for {}: {}", url, e);
                false
            }
        }
    }
}

/// Single-writer deduplicator holding the in-run seen-sets.
#[derive(Debug, Default)]
pub struct Deduplicator {
    config: DedupConfig,
    seen_urls: AHashSet<String>,
    seen_title_set: AHashSet<String>,
    seen_titles: Vec<String>,
}

impl Deduplicator {
    pub fn new(config: DedupConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Number of titles admitted so far in this run
    pub fn seen_count(&self) -> usize {
        self.seen_titles.len()
    }

    /// Forget everything seen in this run
    pub fn reset(&mut self) {
        self.seen_urls.clear();
        self.seen_title_set.clear();
        self.seen_titles.clear();
    }

    /// Withdraw an admitted candidate whose processing failed, so it no
    /// longer shadows later records.
    pub fn forget(&mut self, candidate: &Candidate) {
        let url = candidate.source_url.trim();
        if !url.is_empty() {
            self.seen_urls.remove(url);
        }
        let normalized = normalize_title(&candidate.title);
        if self.seen_title_set.remove(&normalized) {
            self.seen_titles.retain(|t| *t != normalized);
        }
    }

    /// Filter a batch, returning admitted candidates in input order.
    pub fn filter(
        &mut self,
        batch: Vec<Candidate>,
        lookup: Option<&dyn CandidateLookup>,
        now_ms: i64,
    ) -> DedupReport {
        let persisted = self.persisted_view(lookup, now_ms);
        let total = batch.len();
        let mut report = DedupReport::default();

        for candidate in batch {
            match self.check(&candidate, &persisted) {
                None => report.admitted.push(candidate),
                Some(reason) => {
                    debug!("Dropped {} '{}': {}", candidate.id, candidate.title, reason);
                    report.dropped.push(Dropped { candidate, reason });
                }
            }
        }

        info!(
            "Deduplicated {} candidates: {} admitted, {} dropped",
            total,
            report.admitted.len(),
            report.dropped.len()
        );
        report
    }

    /// Check a single candidate, recording it as seen when admitted.
    pub fn check_one(
        &mut self,
        candidate: &Candidate,
        lookup: Option<&dyn CandidateLookup>,
        now_ms: i64,
    ) -> Option<DuplicateReason> {
        let persisted = self.persisted_view(lookup, now_ms);
        self.check(candidate, &persisted)
    }

    fn persisted_view<'a>(
        &self,
        lookup: Option<&'a dyn CandidateLookup>,
        now_ms: i64,
    ) -> PersistedView<'a> {
        match lookup {
            Some(lookup) if self.config.check_persisted => {
                let since_ms = now_ms - i64::from(self.config.window_days) * MS_PER_DAY;
                PersistedView::load(lookup, since_ms)
            }
            _ => PersistedView::empty(),
        }
    }

    fn check(&mut self, candidate: &Candidate, persisted: &PersistedView<'_>) -> Option<DuplicateReason> {
        let normalized = normalize_title(&candidate.title);
        if normalized.is_empty() {
            return Some(DuplicateReason::MissingTitle);
        }

        let url = candidate.source_url.trim();
        if !url.is_empty() && (self.seen_urls.contains(url) || persisted.url_seen(url)) {
            return Some(DuplicateReason::Url);
        }

        if self.seen_title_set.contains(&normalized) || persisted.title_set.contains(&normalized) {
            return Some(DuplicateReason::ExactTitle);
        }

        let threshold = self.config.similarity_threshold;
        let best = self
            .seen_titles
            .iter()
            .chain(&persisted.titles)
            .map(|seen| title_similarity(&normalized, seen))
            .fold(0.0, f64::max);
        if best >= threshold {
            return Some(DuplicateReason::SimilarTitle { similarity: best });
        }

        if !url.is_empty() {
            self.seen_urls.insert(url.to_string());
        }
        self.seen_title_set.insert(normalized.clone());
        self.seen_titles.push(normalized);
        None
    }
}

/// Deduplicator shared between threads; one writer at a time.
#[derive(Debug, Default)]
pub struct SharedDeduplicator {
    inner: Mutex<Deduplicator>,
}

impl SharedDeduplicator {
    pub fn new(config: DedupConfig) -> Self {
        Self {
            inner: Mutex::new(Deduplicator::new(config)),
        }
    }

    pub fn check_one(
        &self,
        candidate: &Candidate,
        lookup: Option<&dyn CandidateLookup>,
        now_ms: i64,
    ) -> Option<DuplicateReason> {
        self.inner.lock().check_one(candidate, lookup, now_ms)
    }

    pub fn filter(
        &self,
        batch: Vec<Candidate>,
        lookup: Option<&dyn CandidateLookup>,
        now_ms: i64,
    ) -> DedupReport {
        self.inner.lock().filter(batch, lookup, now_ms)
    }

    pub fn seen_count(&self) -> usize {
        self.inner.lock().seen_count()
    }

    pub fn into_inner(self) -> Deduplicator {
        self.inner.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CandidateBuilder;
    use crate::storage::{CandidateStore, MemoryStore, StoreError, StoreResult};

    const DAY: i64 = MS_PER_DAY;

    fn candidate(title: &str, url: &str) -> Candidate {
        CandidateBuilder::new().title(title).url(url).build()
    }

    fn titles(report: &DedupReport) -> Vec<&str> {
        report.admitted.iter().map(|c| c.title.as_str()).collect()
    }

    struct FailingLookup;

    impl CandidateLookup for FailingLookup {
        fn url_seen_since(&self, _url: &str, _since_ms: i64) -> StoreResult<bool> {
            Err(StoreError::Backend("connection reset".into()))
        }

        fn titles_since(&self, _since_ms: i64) -> StoreResult<Vec<String>> {
            Err(StoreError::Backend("connection reset".into()))
        }
    }

    #[test]
    fn punctuation_variant_is_dropped() {
        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![
                candidate("Amazon workers in NYC vote to unionize", "https://a.example/1"),
                candidate("Amazon workers in NYC vote to unionize!", "https://b.example/2"),
            ],
            None,
            0,
        );
        assert_eq!(titles(&report), vec!["Amazon workers in NYC vote to unionize"]);
        assert_eq!(report.dropped[0].reason, DuplicateReason::ExactTitle);
    }

    #[test]
    fn same_url_is_dropped() {
        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![
                candidate("Nurses strike in Boston", "https://a.example/1"),
                candidate("Completely different headline", "https://a.example/1"),
            ],
            None,
            0,
        );
        assert_eq!(report.admitted.len(), 1);
        assert_eq!(report.dropped[0].reason, DuplicateReason::Url);
    }

    #[test]
    fn similarity_threshold_decides() {
        let pairs = [
            ("Teachers strike in Chicago", "Teachers strikes in Chicago"),
            ("Nurses strike at Boston hospital", "Transit workers rally in Denver"),
            ("Starbucks baristas walk out", "Starbucks baristas walk out again"),
            ("Union election at Detroit plant", "Union election at Denver plant"),
        ];
        for (a, b) in pairs {
            let similarity = title_similarity(&normalize_title(a), &normalize_title(b));
            let mut dedup = Deduplicator::default();
            let report = dedup.filter(
                vec![candidate(a, "https://a.example/1"), candidate(b, "https://b.example/2")],
                None,
                0,
            );
            let expected = if similarity >= 0.80 { 1 } else { 2 };
            assert_eq!(report.admitted.len(), expected, "{} / {} ({:.3})", a, b, similarity);
        }
    }

    #[test]
    fn distinct_titles_and_urls_both_admitted() {
        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![
                candidate("Nurses strike at Boston hospital", "https://a.example/1"),
                candidate("Transit workers rally in Denver", "https://b.example/2"),
            ],
            None,
            0,
        );
        assert_eq!(report.admitted.len(), 2);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn missing_title_is_skipped() {
        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![candidate("  ", "https://a.example/1"), candidate("Real story", "https://a.example/2")],
            None,
            0,
        );
        assert_eq!(titles(&report), vec!["Real story"]);
        assert_eq!(report.dropped[0].reason, DuplicateReason::MissingTitle);
    }

    #[test]
    fn idempotent_on_own_output() {
        let batch = vec![
            candidate("Amazon workers in NYC vote to unionize", "https://a.example/1"),
            candidate("Amazon workers in NYC vote to unionize!", "https://b.example/2"),
            candidate("Nurses strike at Boston hospital", "https://c.example/3"),
            candidate("Nurses strike at Boston hospital", "https://c.example/3"),
        ];
        let first = Deduplicator::default().filter(batch, None, 0);
        let second = Deduplicator::default().filter(first.admitted.clone(), None, 0);
        assert_eq!(first.admitted, second.admitted);
        assert!(second.dropped.is_empty());
    }

    #[test]
    fn persisted_window_is_consulted() {
        let now = 30 * DAY;
        let mut store = MemoryStore::new();
        store
            .insert_candidate(
                &CandidateBuilder::new()
                    .title("Nurses strike at Boston hospital")
                    .url("https://old.example/recent")
                    .discovered_at_ms(now - 2 * DAY)
                    .build(),
            )
            .unwrap();
        store
            .insert_candidate(
                &CandidateBuilder::new()
                    .title("Bakers rally downtown")
                    .url("https://old.example/stale")
                    .discovered_at_ms(now - 20 * DAY)
                    .build(),
            )
            .unwrap();

        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![
                candidate("Nurses strike at Boston hospital", "https://new.example/1"),
                candidate("Another headline entirely", "https://old.example/recent"),
                candidate("Bakers rally downtown", "https://old.example/stale"),
            ],
            Some(&store),
            now,
        );
        assert_eq!(titles(&report), vec!["Bakers rally downtown"]);
        assert_eq!(report.dropped[0].reason, DuplicateReason::ExactTitle);
        assert_eq!(report.dropped[1].reason, DuplicateReason::Url);
    }

    #[test]
    fn persisted_near_duplicate_title_is_dropped() {
        let now = 30 * DAY;
        let mut store = MemoryStore::new();
        store
            .insert_candidate(
                &CandidateBuilder::new()
                    .title("Teachers strike in Chicago")
                    .url("https://old.example/teachers")
                    .discovered_at_ms(now - DAY)
                    .build(),
            )
            .unwrap();

        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![candidate("Teachers strikes in Chicago", "https://new.example/teachers")],
            Some(&store),
            now,
        );
        assert!(report.admitted.is_empty());
        match report.dropped[0].reason {
            DuplicateReason::SimilarTitle { similarity } => {
                assert!(similarity >= 0.80 && similarity < 1.0, "{}", similarity)
            }
            ref other => panic!("expected a similar-title drop, got {:?}", other),
        }
    }

    #[test]
    fn rediscovery_after_window_is_admitted() {
        let now = 30 * DAY;
        let mut store = MemoryStore::new();
        store
            .insert_candidate(
                &CandidateBuilder::new()
                    .title("Teachers strike in Chicago")
                    .url("https://old.example/teachers")
                    .discovered_at_ms(now - 8 * DAY)
                    .build(),
            )
            .unwrap();

        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![CandidateBuilder::new()
                .title("Teachers strike in Chicago")
                .url("https://old.example/teachers")
                .discovered_at_ms(now)
                .build()],
            Some(&store),
            now,
        );
        assert_eq!(titles(&report), vec!["Teachers strike in Chicago"]);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn forgotten_candidate_no_longer_shadows() {
        let mut dedup = Deduplicator::default();
        let first = candidate("Nurses strike at Boston hospital", "https://a.example/1");
        assert_eq!(dedup.filter(vec![first.clone()], None, 0).admitted.len(), 1);

        dedup.forget(&first);
        assert_eq!(dedup.seen_count(), 0);
        let report = dedup.filter(
            vec![candidate("Nurses strike at Boston hospitals", "https://a.example/1")],
            None,
            0,
        );
        assert_eq!(report.admitted.len(), 1);
    }

    #[test]
    fn persisted_check_can_be_disabled() {
        let mut store = MemoryStore::new();
        store
            .insert_candidate(&candidate("Nurses strike at Boston hospital", "https://a.example/1"))
            .unwrap();
        let mut dedup = Deduplicator::new(DedupConfig {
            check_persisted: false,
            ..DedupConfig::default()
        });
        let report = dedup.filter(
            vec![candidate("Nurses strike at Boston hospital", "https://a.example/1")],
            Some(&store),
            0,
        );
        assert_eq!(report.admitted.len(), 1);
    }

    #[test]
    fn lookup_failure_fails_open() {
        let mut dedup = Deduplicator::default();
        let report = dedup.filter(
            vec![
                candidate("Nurses strike at Boston hospital", "https://a.example/1"),
                candidate("Transit workers rally in Denver", "https://b.example/2"),
            ],
            Some(&FailingLookup),
            0,
        );
        assert_eq!(report.admitted.len(), 2);
    }

    #[test]
    fn shared_deduplicator_admits_once_across_threads() {
        let shared = SharedDeduplicator::default();
        let c = candidate("Amazon workers in NYC vote to unionize", "https://a.example/1");

        let admitted: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| shared.check_one(&c, None, 0).is_none()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap() as usize)
                .sum()
        });

        assert_eq!(admitted, 1);
        assert_eq!(shared.seen_count(), 1);
    }
}
