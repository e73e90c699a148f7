//! SQLite storage backend implementing the candidate and topic store traits

use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use presscheck_core::model::{Candidate, CandidateStatus, Topic, VerificationStatus};
use presscheck_core::storage::{
    CandidateLookup, CandidateStore, StoreError, StoreResult, TopicStore,
};

use crate::error::{backend, SqliteError};
use crate::json::{
    deserialize_scores, deserialize_string_vec, serialize_scores, serialize_string_vec,
    sql_to_timestamp, timestamp_to_sql,
};

const CANDIDATE_COLUMNS: &str = "id, title, description, source_url, discovered_from, \
     event_date, keywords, discovered_at, status, scores";

const TOPIC_COLUMNS: &str = "id, candidate_id, title, description, verification_status, \
     source_count, academic_citation_count, verified_facts, source_plan, confidence_pct, \
     agreement_score, version, created_at, updated_at";

/// Candidate columns exactly as stored, before decoding
struct CandidateRow {
    id: String,
    title: String,
    description: String,
    source_url: String,
    discovered_from: String,
    event_date: Option<String>,
    keywords: String,
    discovered_at: String,
    status: String,
    scores: Option<String>,
}

impl CandidateRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            source_url: row.get(3)?,
            discovered_from: row.get(4)?,
            event_date: row.get(5)?,
            keywords: row.get(6)?,
            discovered_at: row.get(7)?,
            status: row.get(8)?,
            scores: row.get(9)?,
        })
    }

    fn decode(self) -> crate::error::Result<Candidate> {
        let status: CandidateStatus = self
            .status
            .parse()
            .map_err(|e| SqliteError::InvalidData(format!("candidate {}: {}", self.id, e)))?;
        Ok(Candidate {
            event_date_ms: self.event_date.as_deref().map(sql_to_timestamp).transpose()?,
            keywords: deserialize_string_vec(&self.keywords)?,
            discovered_at_ms: sql_to_timestamp(&self.discovered_at)?,
            scores: deserialize_scores(self.scores)?,
            status,
            id: self.id,
            title: self.title,
            description: self.description,
            source_url: self.source_url,
            discovered_from: self.discovered_from,
        })
    }
}

struct TopicRow {
    id: String,
    candidate_id: String,
    title: String,
    description: String,
    verification_status: String,
    source_count: i64,
    academic_citation_count: i64,
    verified_facts: String,
    source_plan: String,
    confidence_pct: i64,
    agreement_score: f64,
    version: i64,
    created_at: String,
    updated_at: String,
}

impl TopicRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            candidate_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            verification_status: row.get(4)?,
            source_count: row.get(5)?,
            academic_citation_count: row.get(6)?,
            verified_facts: row.get(7)?,
            source_plan: row.get(8)?,
            confidence_pct: row.get(9)?,
            agreement_score: row.get(10)?,
            version: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    fn decode(self) -> crate::error::Result<Topic> {
        let verification_status: VerificationStatus = self
            .verification_status
            .parse()
            .map_err(|e| SqliteError::InvalidData(format!("topic {}: {}", self.id, e)))?;
        Ok(Topic {
            verification_status,
            source_count: self.source_count.max(0) as usize,
            academic_citation_count: self.academic_citation_count.max(0) as usize,
            confidence_pct: self.confidence_pct.clamp(0, 100) as u8,
            agreement_score: self.agreement_score,
            version: self.version.max(0) as u64,
            created_at_ms: sql_to_timestamp(&self.created_at)?,
            updated_at_ms: sql_to_timestamp(&self.updated_at)?,
            id: self.id,
            candidate_id: self.candidate_id,
            title: self.title,
            description: self.description,
            verified_facts: self.verified_facts,
            source_plan: self.source_plan,
        })
    }
}

/// SQLite-backed candidate and topic store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite store from a connection
    ///
    /// The connection should already have migrations applied.
    /// Use [`crate::migrate::migrate`] to initialize a fresh database.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Create a new in-memory SQLite store (for testing)
    pub fn in_memory() -> crate::error::Result<Self> {
        let conn = Connection::open_in_memory()?;
        crate::migrate::migrate(&conn)?;
        Ok(Self::new(conn))
    }

    /// Create a new file-backed SQLite store
    pub fn open(path: impl AsRef<std::path::Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        crate::migrate::migrate(&conn)?;
        debug!("Opened candidate store at {}", path.display());
        Ok(Self::new(conn))
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_candidates(
        &self,
        where_clause: &str,
        param: &dyn rusqlite::ToSql,
    ) -> StoreResult<Vec<Candidate>> {
        let sql = format!(
            "SELECT {} FROM candidates WHERE {} ORDER BY discovered_at ASC, id ASC",
            CANDIDATE_COLUMNS, where_clause
        );
        let mut stmt = self.conn.prepare(&sql).map_err(backend)?;
        let rows = stmt
            .query_map([param], CandidateRow::read)
            .map_err(backend)?
            .collect::<Result<Vec<CandidateRow>, rusqlite::Error>>()
            .map_err(backend)?;

        rows.into_iter()
            .map(|row| row.decode().map_err(StoreError::from))
            .collect()
    }

    fn stored_version(&self, id: &str) -> StoreResult<Option<u64>> {
        let version: Option<i64> = self
            .conn
            .query_row("SELECT version FROM topics WHERE id = ?", [id], |row| {
                row.get(0)
            })
            .optional()
            .map_err(backend)?;
        Ok(version.map(|v| v.max(0) as u64))
    }
}

fn row_exists(conn: &Connection, sql: &str, id: &str) -> StoreResult<bool> {
    conn.prepare(sql)
        .map_err(backend)?
        .exists([id])
        .map_err(backend)
}

fn insert_candidate_row(conn: &Connection, candidate: &Candidate) -> StoreResult<()> {
    if row_exists(conn, "SELECT 1 FROM candidates WHERE id = ?", &candidate.id)? {
        return Err(StoreError::AlreadyExists(candidate.id.clone()));
    }

    let keywords_json = serialize_string_vec(&candidate.keywords)?;
    let scores_json = serialize_scores(candidate.scores.as_ref())?;
    let event_date_sql = candidate.event_date_ms.map(timestamp_to_sql).transpose()?;
    let discovered_at_sql = timestamp_to_sql(candidate.discovered_at_ms)?;

    conn.execute(
        "INSERT INTO candidates (id, title, description, source_url, discovered_from,
             event_date, keywords, discovered_at, status, scores)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            candidate.id,
            candidate.title,
            candidate.description,
            candidate.source_url,
            candidate.discovered_from,
            event_date_sql,
            keywords_json,
            discovered_at_sql,
            candidate.status.as_str(),
            scores_json,
        ],
    )
    .map_err(backend)?;
    Ok(())
}

fn insert_topic_row(conn: &Connection, topic: &Topic) -> StoreResult<()> {
    if row_exists(conn, "SELECT 1 FROM topics WHERE id = ?", &topic.id)? {
        return Err(StoreError::AlreadyExists(topic.id.clone()));
    }

    conn.execute(
        "INSERT INTO topics (id, candidate_id, title, description, verification_status,
             source_count, academic_citation_count, verified_facts, source_plan,
             confidence_pct, agreement_score, version, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            topic.id,
            topic.candidate_id,
            topic.title,
            topic.description,
            topic.verification_status.as_str(),
            topic.source_count as i64,
            topic.academic_citation_count as i64,
            topic.verified_facts,
            topic.source_plan,
            topic.confidence_pct as i64,
            topic.agreement_score,
            topic.version as i64,
            timestamp_to_sql(topic.created_at_ms)?,
            timestamp_to_sql(topic.updated_at_ms)?,
        ],
    )
    .map_err(backend)?;
    Ok(())
}

impl CandidateStore for SqliteStore {
    fn insert_candidate(&mut self, candidate: &Candidate) -> StoreResult<()> {
        insert_candidate_row(&self.conn, candidate)
    }

    fn insert_promoted(&mut self, candidate: &Candidate, topic: &Topic) -> StoreResult<()> {
        // Dropping the transaction without commit rolls both inserts back
        let tx = self.conn.transaction().map_err(backend)?;
        insert_candidate_row(&tx, candidate)?;
        insert_topic_row(&tx, topic)?;
        tx.commit().map_err(backend)?;
        debug!("Promoted {} to {}", candidate.id, topic.id);
        Ok(())
    }

    fn get_candidate(&self, id: &str) -> StoreResult<Option<Candidate>> {
        let sql = format!("SELECT {} FROM candidates WHERE id = ?", CANDIDATE_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, [id], CandidateRow::read)
            .optional()
            .map_err(backend)?;

        match row {
            None => Ok(None),
            Some(row) => Ok(Some(row.decode()?)),
        }
    }

    fn update_candidate(&mut self, candidate: &Candidate) -> StoreResult<()> {
        let scores_json = serialize_scores(candidate.scores.as_ref())?;
        let rows_affected = self
            .conn
            .execute(
                "UPDATE candidates SET status = ?, scores = ? WHERE id = ?",
                params![candidate.status.as_str(), scores_json, candidate.id],
            )
            .map_err(backend)?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(candidate.id.clone()));
        }
        Ok(())
    }

    fn candidates_by_status(&self, status: CandidateStatus) -> StoreResult<Vec<Candidate>> {
        self.query_candidates("status = ?", &status.as_str())
    }

    fn candidates_since(&self, since_ms: i64) -> StoreResult<Vec<Candidate>> {
        let since = timestamp_to_sql(since_ms)?;
        self.query_candidates("discovered_at >= ?", &since)
    }

    fn candidate_count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))
            .map_err(backend)?;
        Ok(count.max(0) as usize)
    }
}

impl CandidateLookup for SqliteStore {
    fn url_seen_since(&self, url: &str, since_ms: i64) -> StoreResult<bool> {
        let since = timestamp_to_sql(since_ms)?;
        self.conn
            .prepare("SELECT 1 FROM candidates WHERE source_url = ? AND discovered_at >= ?")
            .map_err(backend)?
            .exists(params![url, since])
            .map_err(backend)
    }

    fn titles_since(&self, since_ms: i64) -> StoreResult<Vec<String>> {
        let since = timestamp_to_sql(since_ms)?;
        let mut stmt = self
            .conn
            .prepare(
                "SELECT title FROM candidates WHERE discovered_at >= ?
                 ORDER BY discovered_at ASC, id ASC",
            )
            .map_err(backend)?;

        let titles = stmt
            .query_map([since], |row| row.get::<_, String>(0))
            .map_err(backend)?
            .collect::<Result<Vec<String>, rusqlite::Error>>()
            .map_err(backend)?;

        Ok(titles)
    }
}

impl TopicStore for SqliteStore {
    fn insert_topic(&mut self, topic: &Topic) -> StoreResult<()> {
        insert_topic_row(&self.conn, topic)
    }

    fn get_topic(&self, id: &str) -> StoreResult<Option<Topic>> {
        let sql = format!("SELECT {} FROM topics WHERE id = ?", TOPIC_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, [id], TopicRow::read)
            .optional()
            .map_err(backend)?;

        match row {
            None => Ok(None),
            Some(row) => Ok(Some(row.decode()?)),
        }
    }

    fn topics_by_status(&self, status: VerificationStatus) -> StoreResult<Vec<Topic>> {
        let sql = format!(
            "SELECT {} FROM topics WHERE verification_status = ?
             ORDER BY created_at ASC, id ASC",
            TOPIC_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).map_err(backend)?;
        let rows = stmt
            .query_map([status.as_str()], TopicRow::read)
            .map_err(backend)?
            .collect::<Result<Vec<TopicRow>, rusqlite::Error>>()
            .map_err(backend)?;

        rows.into_iter()
            .map(|row| row.decode().map_err(StoreError::from))
            .collect()
    }

    fn update_verification(&mut self, topic: &Topic, expected_version: u64) -> StoreResult<()> {
        // Compare-and-set on version; a concurrent run leaves zero rows changed
        let rows_affected = self
            .conn
            .execute(
                "UPDATE topics
                 SET verification_status = ?, source_count = ?, academic_citation_count = ?,
                     verified_facts = ?, source_plan = ?, confidence_pct = ?,
                     agreement_score = ?, version = ?, updated_at = ?
                 WHERE id = ? AND version = ?",
                params![
                    topic.verification_status.as_str(),
                    topic.source_count as i64,
                    topic.academic_citation_count as i64,
                    topic.verified_facts,
                    topic.source_plan,
                    topic.confidence_pct as i64,
                    topic.agreement_score,
                    topic.version as i64,
                    timestamp_to_sql(topic.updated_at_ms)?,
                    topic.id,
                    expected_version as i64,
                ],
            )
            .map_err(backend)?;

        if rows_affected > 0 {
            return Ok(());
        }
        match self.stored_version(&topic.id)? {
            None => Err(StoreError::NotFound(topic.id.clone())),
            Some(found) => Err(StoreError::VersionConflict {
                id: topic.id.clone(),
                expected: expected_version,
                found,
            }),
        }
    }
}
