//! Source records and credibility tiers

use serde::{Deserialize, Deserializer, Serialize};

use super::ModelError;

/// Kind of corroborating source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    GovernmentDocument,
    CourtFiling,
    Academic,
    OfficialStatement,
    WireService,
    Investigative,
    NewsAgency,
    News,
    Social,
    Blog,
    Anonymous,
    #[default]
    Unknown,
}

impl SourceType {
    /// Parse a free-form label from the search collaborator.
    ///
    /// Unrecognized labels map to `Unknown` rather than failing; the label is
    /// a hint, and an unknown source simply lands in the lowest tier.
    pub fn from_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase().replace(['-', ' '], "_");
        match lower.as_str() {
            "government" | "government_document" | "gov" | "government_filing" => {
                Self::GovernmentDocument
            }
            "court" | "court_filing" | "court_document" | "legal_filing" => Self::CourtFiling,
            "academic" | "journal" | "study" | "research" | "academic_paper" => Self::Academic,
            "official" | "official_statement" | "press_release" => Self::OfficialStatement,
            "wire" | "wire_service" => Self::WireService,
            "investigative" | "investigative_outlet" => Self::Investigative,
            "news_agency" | "agency" => Self::NewsAgency,
            "news" | "newspaper" | "broadcast" | "mainstream" => Self::News,
            "social" | "social_media" | "twitter" | "reddit" => Self::Social,
            "blog" | "newsletter" => Self::Blog,
            "anonymous" => Self::Anonymous,
            _ => Self::Unknown,
        }
    }

    /// Primary documents land in tier 1 regardless of domain
    pub fn is_primary_document(&self) -> bool {
        matches!(
            self,
            Self::GovernmentDocument | Self::CourtFiling | Self::Academic | Self::OfficialStatement
        )
    }

    pub fn is_academic(&self) -> bool {
        *self == Self::Academic
    }

    /// Government records and court filings
    pub fn is_official_record(&self) -> bool {
        matches!(self, Self::GovernmentDocument | Self::CourtFiling)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GovernmentDocument => "government_document",
            Self::CourtFiling => "court_filing",
            Self::Academic => "academic",
            Self::OfficialStatement => "official_statement",
            Self::WireService => "wire_service",
            Self::Investigative => "investigative",
            Self::NewsAgency => "news_agency",
            Self::News => "news",
            Self::Social => "social",
            Self::Blog => "blog",
            Self::Anonymous => "anonymous",
            Self::Unknown => "unknown",
        }
    }
}

// Labels come from external search results, so deserialization is lenient.
impl<'de> Deserialize<'de> for SourceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search result handed in by the source-identification collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub source_type: SourceType,
    /// Text excerpt used for cross-referencing
    #[serde(default)]
    pub snippet: String,
}

impl SourceRecord {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        source_type: SourceType,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            source_type,
            snippet: snippet.into(),
        }
    }
}

/// Credibility tier of a source (1 highest, 4 lowest).
///
/// Tiers drive reader-facing trust signals, so values outside 1-4 are
/// rejected rather than clamped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum CredibilityTier {
    /// Primary documents and official/academic domains (90-100)
    Primary = 1,
    /// Wire services, investigative outlets, major newspapers (70-89)
    Established = 2,
    /// Other mainstream news (50-69)
    Mainstream = 3,
    /// Social, blogs, unmatched or anonymous sources (0-49)
    #[default]
    Unverified = 4,
}

impl CredibilityTier {
    pub const ALL: [CredibilityTier; 4] = [
        Self::Primary,
        Self::Established,
        Self::Mainstream,
        Self::Unverified,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    /// Inclusive score band for this tier
    pub fn score_band(&self) -> (u8, u8) {
        match self {
            Self::Primary => (90, 100),
            Self::Established => (70, 89),
            Self::Mainstream => (50, 69),
            Self::Unverified => (0, 49),
        }
    }

    /// Tier 1 and 2 sources count toward the credible-source total
    pub fn is_credible(&self) -> bool {
        matches!(self, Self::Primary | Self::Established)
    }
}

impl TryFrom<u8> for CredibilityTier {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Established),
            3 => Ok(Self::Mainstream),
            4 => Ok(Self::Unverified),
            other => Err(ModelError::InvalidTier(other)),
        }
    }
}

impl From<CredibilityTier> for u8 {
    fn from(tier: CredibilityTier) -> Self {
        tier as u8
    }
}

impl std::fmt::Display for CredibilityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tier {}", self.number())
    }
}

/// A source after credibility ranking. Recomputed on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSource {
    pub name: String,
    pub url: String,
    pub source_type: SourceType,
    pub credibility_tier: CredibilityTier,
    /// 0-100, always inside the tier's band
    pub credibility_score: u8,
    /// 1-based position in the ranking
    pub rank: usize,
    pub justification: String,
}
