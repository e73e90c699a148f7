//! Window, status and version-guard tests for SqliteStore

use pretty_assertions::assert_eq;
use presscheck_core::model::{
    Candidate, CandidateBuilder, CandidateStatus, Topic, VerificationStatus,
};
use presscheck_core::storage::{CandidateLookup, CandidateStore, StoreError, TopicStore};
use presscheck_sqlite::SqliteStore;

const DAY_MS: i64 = 86_400_000;
const NOW: i64 = 1_704_067_200_000;

fn candidate(title: &str, url: &str, discovered_at_ms: i64) -> Candidate {
    CandidateBuilder::new()
        .title(title)
        .url(url)
        .discovered_at_ms(discovered_at_ms)
        .build()
}

fn seeded_store() -> SqliteStore {
    let mut store = SqliteStore::in_memory().unwrap();
    store
        .insert_candidate(&candidate("Old layoffs story", "https://example.com/old", NOW - 10 * DAY_MS))
        .unwrap();
    store
        .insert_candidate(&candidate("Nurses strike", "https://example.com/nurses", NOW - 2 * DAY_MS))
        .unwrap();
    store
        .insert_candidate(&candidate("Bus drivers rally", "https://example.com/drivers", NOW - DAY_MS))
        .unwrap();
    store
}

#[test]
fn test_url_seen_within_window() {
    let store = seeded_store();
    let since = NOW - 7 * DAY_MS;

    assert!(store.url_seen_since("https://example.com/nurses", since).unwrap());
    assert!(!store.url_seen_since("https://example.com/old", since).unwrap());
    assert!(!store.url_seen_since("https://example.com/unknown", since).unwrap());
}

#[test]
fn test_titles_since_oldest_first() {
    let store = seeded_store();
    let titles = store.titles_since(NOW - 7 * DAY_MS).unwrap();
    assert_eq!(titles, vec!["Nurses strike", "Bus drivers rally"]);
}

#[test]
fn test_window_boundary_is_inclusive() {
    let store = seeded_store();
    let titles = store.titles_since(NOW - 2 * DAY_MS).unwrap();
    assert_eq!(titles, vec!["Nurses strike", "Bus drivers rally"]);
}

#[test]
fn test_candidates_since_and_by_status() {
    let mut store = seeded_store();
    let mut drivers = store
        .candidates_since(NOW - DAY_MS)
        .unwrap()
        .pop()
        .unwrap();
    assert_eq!(drivers.title, "Bus drivers rally");

    drivers.transition(CandidateStatus::Evaluated).unwrap();
    drivers.transition(CandidateStatus::Rejected).unwrap();
    store.update_candidate(&drivers).unwrap();

    let rejected = store.candidates_by_status(CandidateStatus::Rejected).unwrap();
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].id, drivers.id);
    assert_eq!(
        store.candidates_by_status(CandidateStatus::Discovered).unwrap().len(),
        2
    );
}

fn store_with_topic() -> (SqliteStore, Topic) {
    let mut store = SqliteStore::in_memory().unwrap();
    let c = candidate("Nurses strike", "https://example.com/nurses", NOW);
    store.insert_candidate(&c).unwrap();
    let topic = Topic::from_candidate(&c, NOW);
    store.insert_topic(&topic).unwrap();
    (store, topic)
}

#[test]
fn test_verification_write_bumps_version() {
    let (mut store, mut topic) = store_with_topic();

    topic.verification_status = VerificationStatus::Verified;
    topic.source_count = 2;
    topic.confidence_pct = 64;
    topic.version = 1;
    topic.updated_at_ms = NOW + 1_000;
    store.update_verification(&topic, 0).unwrap();

    let stored = store.get_topic(&topic.id).unwrap().unwrap();
    assert_eq!(stored, topic);
    assert_eq!(
        store.topics_by_status(VerificationStatus::Verified).unwrap().len(),
        1
    );
    assert!(store
        .topics_by_status(VerificationStatus::Unverified)
        .unwrap()
        .is_empty());
}

#[test]
fn test_stale_version_is_rejected() {
    let (mut store, topic) = store_with_topic();

    let mut first = topic.clone();
    first.verification_status = VerificationStatus::Certified;
    first.version = 1;
    store.update_verification(&first, 0).unwrap();

    let mut second = topic.clone();
    second.verification_status = VerificationStatus::Unverified;
    second.version = 1;
    let result = store.update_verification(&second, 0);
    assert_eq!(
        result,
        Err(StoreError::VersionConflict {
            id: topic.id.clone(),
            expected: 0,
            found: 1,
        })
    );

    let stored = store.get_topic(&topic.id).unwrap().unwrap();
    assert_eq!(stored.verification_status, VerificationStatus::Certified);
}

#[test]
fn test_verification_of_missing_topic() {
    let mut store = SqliteStore::in_memory().unwrap();
    let c = candidate("Nurses strike", "https://example.com/nurses", NOW);
    let topic = Topic::from_candidate(&c, NOW);
    assert!(matches!(
        store.update_verification(&topic, 0),
        Err(StoreError::NotFound(_))
    ));
}
