//! Candidate records and their lifecycle

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ids::candidate_id;
use super::ModelError;
use crate::scoring::ScoreBreakdown;

/// Lifecycle status of a discovered candidate.
///
/// ```text
/// discovered → evaluated → approved → converted
///                        ↘ rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    #[default]
    Discovered,
    Evaluated,
    Approved,
    Rejected,
    Converted,
}

impl CandidateStatus {
    /// Whether moving from `self` to `next` is a legal lifecycle step
    pub fn can_transition_to(&self, next: CandidateStatus) -> bool {
        use CandidateStatus::*;
        matches!(
            (self, next),
            (Discovered, Evaluated)
                | (Evaluated, Approved)
                | (Evaluated, Rejected)
                | (Approved, Converted)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Evaluated => "evaluated",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Converted => "converted",
        }
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CandidateStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "discovered" => Ok(Self::Discovered),
            "evaluated" => Ok(Self::Evaluated),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "converted" => Ok(Self::Converted),
            other => Err(ModelError::UnknownStatus(other.to_string())),
        }
    }
}

/// Raw candidate record as handed in by feed collaborators.
///
/// Every field is optional on the wire; normalization happens in
/// [`Candidate::from_raw`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub discovered_from: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A discovered news signal before admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// CDID: CD + 16 hex chars of SHA-256(url, title)
    pub id: String,
    pub title: String,
    pub description: String,
    /// Where the signal was found
    pub source_url: String,
    /// Discovery channel label (e.g. "rss", "reddit", "gov_scrape")
    pub discovered_from: String,
    /// When the underlying event happened (Unix timestamp milliseconds)
    #[serde(default)]
    pub event_date_ms: Option<i64>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// When the feed handed the record in (Unix timestamp milliseconds)
    pub discovered_at_ms: i64,
    #[serde(default)]
    pub status: CandidateStatus,
    /// Attached by the scorer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreBreakdown>,
}

impl Candidate {
    /// Normalize a raw feed record.
    ///
    /// An unparseable event date becomes `None` (neutral recency) and an
    /// unknown status falls back to `discovered`; neither aborts the record.
    pub fn from_raw(raw: RawCandidate, discovered_at_ms: i64) -> Self {
        let title = raw.title.trim().to_string();
        let source_url = raw.source_url.trim().to_string();
        let event_date_ms = raw.event_date.as_deref().and_then(parse_event_date);
        if raw.event_date.is_some() && event_date_ms.is_none() {
            tracing::debug!(title = %title, "unparseable event date, treating as unknown");
        }
        let status = raw
            .status
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            id: candidate_id(&source_url, &title, discovered_at_ms),
            title,
            description: raw.description.trim().to_string(),
            source_url,
            discovered_from: raw.discovered_from,
            event_date_ms,
            keywords: raw.keywords,
            discovered_at_ms,
            status,
            scores: None,
        }
    }

    /// Move to the next lifecycle status, rejecting illegal steps.
    pub fn transition(&mut self, next: CandidateStatus) -> Result<(), ModelError> {
        if !self.status.can_transition_to(next) {
            return Err(ModelError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Title plus description, the text every scorer reads
    pub fn full_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

/// Builder for creating candidates (mostly for tests and collaborators)
#[derive(Debug)]
pub struct CandidateBuilder {
    raw: RawCandidate,
    event_date_ms: Option<i64>,
    discovered_at_ms: i64,
}

impl Default for CandidateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawCandidate::default(),
            event_date_ms: None,
            discovered_at_ms: 0,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.raw.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.raw.description = description.into();
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.raw.source_url = url.into();
        self
    }

    pub fn discovered_from(mut self, channel: impl Into<String>) -> Self {
        self.raw.discovered_from = channel.into();
        self
    }

    pub fn event_date_ms(mut self, ms: i64) -> Self {
        self.event_date_ms = Some(ms);
        self
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.raw.keywords.push(keyword.into());
        self
    }

    pub fn discovered_at_ms(mut self, ms: i64) -> Self {
        self.discovered_at_ms = ms;
        self
    }

    pub fn build(self) -> Candidate {
        let mut candidate = Candidate::from_raw(self.raw, self.discovered_at_ms);
        if self.event_date_ms.is_some() {
            candidate.event_date_ms = self.event_date_ms;
        }
        candidate
    }
}

/// Parse an event date as RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_event_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
