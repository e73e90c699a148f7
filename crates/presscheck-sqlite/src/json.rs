//! Column encoding helpers for SQLite storage
//!
//! List and score columns hold JSON text. Timestamps are stored as RFC 3339
//! strings with fixed millisecond precision in UTC, so lexical order in SQL
//! matches chronological order.

use chrono::{DateTime, SecondsFormat};
use presscheck_core::scoring::ScoreBreakdown;

use crate::error::{Result, SqliteError};

/// Serialize a Vec<String> to JSON string for SQLite storage
pub fn serialize_string_vec(vec: &[String]) -> Result<String> {
    Ok(serde_json::to_string(vec)?)
}

/// Deserialize a JSON string from SQLite to Vec<String>
pub fn deserialize_string_vec(json: &str) -> Result<Vec<String>> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize an optional score breakdown; unscored candidates store NULL
pub fn serialize_scores(scores: Option<&ScoreBreakdown>) -> Result<Option<String>> {
    scores
        .map(serde_json::to_string)
        .transpose()
        .map_err(SqliteError::from)
}

pub fn deserialize_scores(json: Option<String>) -> Result<Option<ScoreBreakdown>> {
    match json {
        Some(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
        None => Ok(None),
    }
}

/// Convert Unix timestamp milliseconds to SQLite DATETIME string (RFC 3339)
pub fn timestamp_to_sql(timestamp_ms: i64) -> Result<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| SqliteError::InvalidData(format!("timestamp out of range: {}", timestamp_ms)))
}

/// Convert SQLite DATETIME string (RFC 3339) to Unix timestamp milliseconds
pub fn sql_to_timestamp(datetime_str: &str) -> Result<i64> {
    let dt = DateTime::parse_from_rfc3339(datetime_str)
        .map_err(|e| SqliteError::InvalidData(format!("Invalid datetime '{}': {}", datetime_str, e)))?;
    Ok(dt.timestamp_millis())
}
