//! Source credibility tiers and ranking
//!
//! Every source lands in exactly one of four tiers:
//!
//! - **Tier 1** (90-100): primary documents and official or academic domains
//! - **Tier 2** (70-89): wire services, investigative outlets, major papers
//! - **Tier 3** (50-69): other mainstream news
//! - **Tier 4** (0-49): social platforms, blogs, anonymous or unmatched
//!
//! Scores are computed inside the tier's band, so a tier-1 source always
//! outranks a tier-2 source regardless of secondary signals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::model::{CredibilityTier, RankedSource, SourceRecord, SourceType};
use crate::text::{host_matches, url_host};

/// Credible sources needed on their own to satisfy the check
pub const MIN_CREDIBLE_SOURCES: usize = 3;
/// Academic sources needed on their own to satisfy the check
pub const MIN_ACADEMIC_SOURCES: usize = 2;

const BASE_FRACTION: f64 = 0.2;
const TYPE_FIT_FRACTION: f64 = 0.35;
const DOMAIN_FRACTION: f64 = 0.35;
const HTTPS_FRACTION: f64 = 0.05;
const SNIPPET_FRACTION: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredibilityError {
    /// Tier number outside 1-4
    #[error("credibility tier out of range: {0} (expected 1-4)")]
    InvalidTier(u8),

    /// A configured override names a tier outside 1-4
    #[error("override for '{domain}' names invalid tier {tier}")]
    InvalidOverride { domain: String, tier: u8 },
}

/// Validate a tier number at the boundary.
pub fn tier_from_number(value: u8) -> Result<CredibilityTier, CredibilityError> {
    CredibilityTier::try_from(value).map_err(|_| CredibilityError::InvalidTier(value))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Domain allow-lists used to place sources into tiers.
///
/// Entries starting with a dot match by suffix (`.gov` matches `bls.gov`);
/// other entries match the host or any subdomain of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainLists {
    /// Official and government domains
    pub primary: Vec<String>,
    /// Academic publishers and institutions; always tier 1
    pub academic: Vec<String>,
    /// Wire services, investigative outlets, major newspapers and broadcasters
    pub established: Vec<String>,
    /// Other mainstream news outlets
    pub mainstream: Vec<String>,
    /// Social platforms and self-publishing hosts
    pub social: Vec<String>,
    /// Editorial overrides: domain to tier number (1-4)
    pub overrides: BTreeMap<String, u8>,
}

impl Default for DomainLists {
    fn default() -> Self {
        Self {
            primary: strings(&[
                ".gov", ".mil", "nlrb.gov", "bls.gov", "dol.gov", "osha.gov", "uscourts.gov",
                "supremecourt.gov", "congress.gov", "courtlistener.com", "ilo.org",
            ]),
            academic: strings(&[
                ".edu", ".ac.uk", "arxiv.org", "doi.org", "jstor.org", "nber.org", "ssrn.com",
                "epi.org", "pewresearch.org", "brookings.edu",
            ]),
            established: strings(&[
                "apnews.com", "reuters.com", "propublica.org", "nytimes.com",
                "washingtonpost.com", "wsj.com", "bbc.com", "bbc.co.uk", "npr.org",
                "theguardian.com", "bloomberg.com", "pbs.org", "ft.com", "economist.com",
                "latimes.com", "revealnews.org", "themarkup.org",
            ]),
            mainstream: strings(&[
                "cnn.com", "nbcnews.com", "abcnews.go.com", "cbsnews.com", "foxnews.com",
                "usatoday.com", "axios.com", "politico.com", "thehill.com", "vice.com",
                "huffpost.com", "newsweek.com", "time.com", "businessinsider.com",
                "theverge.com", "vox.com", "msnbc.com",
            ]),
            social: strings(&[
                "twitter.com", "x.com", "reddit.com", "facebook.com", "instagram.com",
                "tiktok.com", "youtube.com", "medium.com", "substack.com", "threads.net",
                "bsky.app", "linkedin.com", "blogspot.com", "wordpress.com", "tumblr.com",
            ]),
            overrides: BTreeMap::new(),
        }
    }
}

impl DomainLists {
    fn matches(list: &[String], host: &str) -> bool {
        !host.is_empty() && list.iter().any(|d| host_matches(host, d))
    }
}

/// Tier and score for one source, before ordering
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub tier: CredibilityTier,
    pub score: u8,
    pub academic: bool,
    pub justification: String,
}

/// Whether a source set carries enough credible backing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CredibilityCheck {
    /// Tier 1 and tier 2 sources
    pub credible_sources: usize,
    /// Academic sources (always tier 1)
    pub academic_citations: usize,
    /// Sources per tier, index 0 is tier 1
    pub tier_counts: [usize; 4],
    /// At least 3 credible sources, or at least 2 academic sources
    pub passed: bool,
}

/// Assigns tiers and orders sources by credibility.
#[derive(Debug, Clone)]
pub struct CredibilityRanker {
    lists: DomainLists,
    overrides: Vec<(String, CredibilityTier)>,
}

impl Default for CredibilityRanker {
    fn default() -> Self {
        Self {
            lists: DomainLists::default(),
            overrides: Vec::new(),
        }
    }
}

impl CredibilityRanker {
    /// Build a ranker, rejecting overrides that name a tier outside 1-4.
    pub fn new(lists: DomainLists) -> Result<Self, CredibilityError> {
        let overrides = lists
            .overrides
            .iter()
            .map(|(domain, tier)| {
                CredibilityTier::try_from(*tier)
                    .map(|t| (domain.clone(), t))
                    .map_err(|_| CredibilityError::InvalidOverride {
                        domain: domain.clone(),
                        tier: *tier,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lists, overrides })
    }

    pub fn lists(&self) -> &DomainLists {
        &self.lists
    }

    /// Whether a source counts as an academic citation
    pub fn is_academic(&self, source_type: SourceType, url: &str) -> bool {
        source_type.is_academic() || DomainLists::matches(&self.lists.academic, &url_host(url))
    }

    /// Tier, in-band score, and justification for one source
    pub fn assess(&self, source: &SourceRecord) -> Assessment {
        let host = url_host(&source.url);
        let lists = &self.lists;
        let academic = self.is_academic(source.source_type, &source.url);

        let (tier, type_fits, domain_listed, reason) = if let Some(tier) = self
            .overrides
            .iter()
            .find(|(domain, _)| host_matches(&host, domain))
            .map(|(_, tier)| *tier)
        {
            (tier, false, true, format!("editorial override for {}", host))
        } else if source.source_type.is_primary_document() {
            let listed = DomainLists::matches(&lists.primary, &host)
                || DomainLists::matches(&lists.academic, &host);
            (
                CredibilityTier::Primary,
                true,
                listed,
                format!("primary document ({})", source.source_type),
            )
        } else if academic {
            (CredibilityTier::Primary, false, true, format!("academic domain {}", host))
        } else if DomainLists::matches(&lists.primary, &host) {
            (CredibilityTier::Primary, false, true, format!("official domain {}", host))
        } else if matches!(
            source.source_type,
            SourceType::WireService | SourceType::Investigative
        ) {
            let listed = DomainLists::matches(&lists.established, &host);
            (
                CredibilityTier::Established,
                true,
                listed,
                format!("{} outlet", source.source_type),
            )
        } else if DomainLists::matches(&lists.established, &host) {
            (
                CredibilityTier::Established,
                matches!(source.source_type, SourceType::News | SourceType::NewsAgency),
                true,
                format!("established outlet {}", host),
            )
        } else if DomainLists::matches(&lists.social, &host) {
            (
                CredibilityTier::Unverified,
                false,
                true,
                format!("social or self-published platform {}", host),
            )
        } else if DomainLists::matches(&lists.mainstream, &host) {
            (
                CredibilityTier::Mainstream,
                matches!(source.source_type, SourceType::News | SourceType::NewsAgency),
                true,
                format!("mainstream outlet {}", host),
            )
        } else if matches!(source.source_type, SourceType::News | SourceType::NewsAgency) {
            (
                CredibilityTier::Mainstream,
                true,
                false,
                format!("{} source on unlisted domain", source.source_type),
            )
        } else {
            (
                CredibilityTier::Unverified,
                false,
                false,
                format!("{} source, no credibility signal", source.source_type),
            )
        };

        let score = Self::band_score(tier, source, type_fits, domain_listed);
        Assessment {
            tier,
            score,
            academic,
            justification: format!("{}: {}", tier, reason),
        }
    }

    /// Position inside the tier's band from secondary signals
    fn band_score(
        tier: CredibilityTier,
        source: &SourceRecord,
        type_fits: bool,
        domain_listed: bool,
    ) -> u8 {
        let (low, high) = tier.score_band();
        if source.source_type == SourceType::Anonymous {
            return low;
        }
        let mut fraction = BASE_FRACTION;
        if type_fits {
            fraction += TYPE_FIT_FRACTION;
        }
        // A listed social platform is a known quantity, not a credibility boost
        if domain_listed && tier != CredibilityTier::Unverified {
            fraction += DOMAIN_FRACTION;
        }
        if source.url.trim().to_lowercase().starts_with("https://") {
            fraction += HTTPS_FRACTION;
        }
        if !source.snippet.trim().is_empty() {
            fraction += SNIPPET_FRACTION;
        }
        let width = f64::from(high - low);
        let offset = (width * fraction.min(1.0)).round() as u8;
        (low + offset).min(high)
    }

    /// Tier, score, and order a source list (tier ascending, score
    /// descending, name for ties). Ranks are 1-based.
    pub fn rank(&self, sources: &[SourceRecord]) -> Vec<RankedSource> {
        #[cfg(feature = "parallel")]
        let assessed: Vec<Assessment> = sources.par_iter().map(|s| self.assess(s)).collect();
        #[cfg(not(feature = "parallel"))]
        let assessed: Vec<Assessment> = sources.iter().map(|s| self.assess(s)).collect();

        let mut ranked: Vec<RankedSource> = sources
            .iter()
            .zip(assessed)
            .map(|(source, assessment)| RankedSource {
                name: source.name.clone(),
                url: source.url.clone(),
                source_type: source.source_type,
                credibility_tier: assessment.tier,
                credibility_score: assessment.score,
                rank: 0,
                justification: assessment.justification,
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.credibility_tier
                .cmp(&b.credibility_tier)
                .then_with(|| b.credibility_score.cmp(&a.credibility_score))
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.url.cmp(&b.url))
        });
        for (i, source) in ranked.iter_mut().enumerate() {
            source.rank = i + 1;
            debug!(
                "Ranked #{} {} ({}, score {})",
                source.rank, source.name, source.credibility_tier, source.credibility_score
            );
        }
        ranked
    }

    /// Count credible and academic sources in a ranked list
    pub fn check(&self, ranked: &[RankedSource]) -> CredibilityCheck {
        let mut check = CredibilityCheck::default();
        for source in ranked {
            check.tier_counts[usize::from(source.credibility_tier.number()) - 1] += 1;
            if source.credibility_tier.is_credible() {
                check.credible_sources += 1;
            }
            if source.credibility_tier == CredibilityTier::Primary
                && self.is_academic(source.source_type, &source.url)
            {
                check.academic_citations += 1;
            }
        }
        check.passed = check.credible_sources >= MIN_CREDIBLE_SOURCES
            || check.academic_citations >= MIN_ACADEMIC_SOURCES;
        check
    }
}

/// Human-readable ranking summary for operators
pub fn ranking_summary(ranked: &[RankedSource], check: &CredibilityCheck) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} sources: {} credible (tier 1-2), {} academic\n",
        ranked.len(),
        check.credible_sources,
        check.academic_citations
    ));
    for (i, count) in check.tier_counts.iter().enumerate() {
        out.push_str(&format!("  tier {}: {}\n", i + 1, count));
    }
    out.push_str(if check.passed {
        "Credibility check: passed\n"
    } else {
        "Credibility check: not met (needs 3 tier 1-2 sources or 2 academic)\n"
    });
    for source in ranked {
        out.push_str(&format!(
            "{:>3}. [{}] {:>3}  {}  <{}>\n       {}\n",
            source.rank,
            source.credibility_tier.number(),
            source.credibility_score,
            source.name,
            source.url,
            source.justification
        ));
    }
    out
}
