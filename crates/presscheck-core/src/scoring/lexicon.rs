//! Keyword tables for the dimension scorers
//!
//! Each scorer owns an immutable lexicon injected at construction. The
//! `Default` impls hold the reference US-English tables; deployments for
//! another locale replace them through [`crate::config::PipelineConfig`].

use serde::{Deserialize, Serialize};

fn terms(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn weighted(items: &[(&str, f64)]) -> Vec<WeightedTerm> {
    items
        .iter()
        .map(|(term, weight)| WeightedTerm {
            term: term.to_string(),
            weight: *weight,
        })
        .collect()
}

/// A term with its own contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedTerm {
    pub term: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerImpactLexicon {
    /// Collective action terms ("strike", "unionize")
    pub high_impact: Vec<String>,
    /// Economic pressure terms ("wage", "layoff")
    pub medium_impact: Vec<String>,
    /// Named working-class sectors and large employers
    pub sectors: Vec<String>,
    /// Words that mark a dollar amount as pay
    pub wage_context: Vec<String>,
    /// Nouns a head count attaches to ("300 workers")
    pub worker_nouns: Vec<String>,
}

impl Default for WorkerImpactLexicon {
    fn default() -> Self {
        Self {
            high_impact: terms(&[
                "strike",
                "striking",
                "unioniz",
                "walkout",
                "walk out",
                "lockout",
                "locked out",
                "picket",
                "collective bargaining",
                "union vote",
                "union election",
                "organizing drive",
                "sickout",
                "sick out",
                "wildcat",
            ]),
            medium_impact: terms(&[
                "wage",
                "layoff",
                "laid off",
                "union",
                "overtime",
                "pension",
                "benefits",
                "contract",
                "labor",
                "labour",
                "workers",
                "employees",
                "pay raise",
                "fired",
                "retaliat",
                "job cuts",
                "furlough",
                "health insurance",
                "working conditions",
            ]),
            sectors: terms(&[
                "warehouse",
                "retail",
                "fast food",
                "restaurant",
                "nurse",
                "hospital",
                "teacher",
                "school",
                "driver",
                "trucking",
                "rideshare",
                "delivery",
                "factory",
                "manufacturing",
                "autoworker",
                "auto workers",
                "construction",
                "miners",
                "mining",
                "farmworker",
                "agricultur",
                "janitor",
                "hotel",
                "hospitality",
                "meatpacking",
                "dockworker",
                "longshore",
                "rail",
                "airline",
                "flight attendant",
                "gig worker",
                "gig economy",
                "amazon",
                "starbucks",
                "walmart",
                "uber",
            ]),
            wage_context: terms(&[
                "wage", "pay", "paid", "hour", "hourly", "salary", "raise", "earn", "minimum",
            ]),
            worker_nouns: terms(&[
                "worker", "employee", "member", "nurse", "teacher", "driver", "staff", "miner",
                "janitor", "laborer", "associate", "people",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinessLexicon {
    pub urgent: Vec<String>,
    pub scheduled: Vec<String>,
    pub historical: Vec<String>,
}

impl Default for TimelinessLexicon {
    fn default() -> Self {
        Self {
            urgent: terms(&[
                "breaking",
                "urgent",
                "just in",
                "developing",
                "happening now",
                "right now",
                "tonight",
                "this morning",
                "imminent",
            ]),
            scheduled: terms(&[
                "upcoming",
                "scheduled",
                "set to",
                "planned",
                "next week",
                "tomorrow",
                "this weekend",
                "deadline",
                "will vote",
            ]),
            historical: terms(&[
                "anniversary",
                "years ago",
                "decades ago",
                "in history",
                "historically",
                "remembering",
                "retrospective",
                "looking back",
                "a century",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifiabilityLexicon {
    pub wire_services: Vec<String>,
    pub regional_outlets: Vec<String>,
    pub social_posts: Vec<String>,
    /// Phrasing that cites more than one source or a document
    pub citations: Vec<String>,
    pub hedging: Vec<String>,
}

impl Default for VerifiabilityLexicon {
    fn default() -> Self {
        Self {
            wire_services: terms(&[
                "associated press",
                "reuters",
                "bloomberg",
                "agence france",
                "afp",
                "upi",
            ]),
            regional_outlets: terms(&[
                "new york times",
                "washington post",
                "los angeles times",
                "boston globe",
                "npr",
                "guardian",
                "tribune",
                "herald",
                "gazette",
                "chronicle",
                "inquirer",
                "local news",
            ]),
            social_posts: terms(&[
                "tweet",
                "twitter",
                "posted on",
                "reddit",
                "facebook",
                "tiktok",
                "instagram",
                "viral",
                "social media",
            ]),
            citations: terms(&[
                "according to",
                "confirmed by",
                "multiple sources",
                "documents show",
                "records show",
                "filed with",
                "court records",
                "data from",
                "in a statement",
                "press release",
            ]),
            hedging: terms(&[
                "allegedly",
                "reportedly",
                "unconfirmed",
                "rumor",
                "rumour",
                "anonymous source",
                "unnamed",
                "sources say",
                "it is believed",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionalLexicon {
    /// Candidate keyword that marks national scope explicitly
    pub national_flag: String,
    pub national_terms: Vec<String>,
    /// Population-weighted metro areas
    pub metros: Vec<WeightedTerm>,
    /// Population-weighted states
    pub states: Vec<WeightedTerm>,
    /// Terms describing multi-city reach
    pub regional_descriptors: Vec<String>,
}

impl Default for RegionalLexicon {
    fn default() -> Self {
        Self {
            national_flag: "national".to_string(),
            national_terms: terms(&[
                "nationwide",
                "national",
                "across the country",
                "across the us",
                "all 50 states",
                "federal",
                "congress",
                "white house",
            ]),
            metros: weighted(&[
                ("new york", 8.5),
                ("nyc", 8.5),
                ("los angeles", 8.0),
                ("chicago", 7.5),
                ("houston", 7.0),
                ("manhattan", 7.0),
                ("brooklyn", 7.0),
                ("philadelphia", 6.5),
                ("dallas", 6.5),
                ("san francisco", 6.5),
                ("bay area", 6.5),
                ("staten island", 6.0),
                ("phoenix", 6.0),
                ("seattle", 6.0),
                ("boston", 6.0),
                ("atlanta", 6.0),
                ("miami", 6.0),
                ("washington dc", 6.0),
                ("san antonio", 5.5),
                ("san diego", 5.5),
                ("detroit", 5.5),
                ("minneapolis", 5.0),
                ("denver", 5.0),
                ("las vegas", 5.0),
                ("portland", 4.5),
                ("pittsburgh", 4.5),
            ]),
            states: weighted(&[
                ("california", 7.5),
                ("texas", 7.0),
                ("florida", 6.5),
                ("illinois", 5.5),
                ("pennsylvania", 5.5),
                ("ohio", 5.0),
                ("georgia", 5.0),
                ("michigan", 5.0),
                ("north carolina", 5.0),
                ("new jersey", 5.0),
                ("virginia", 4.5),
                ("arizona", 4.5),
                ("massachusetts", 4.5),
                ("tennessee", 4.0),
                ("wisconsin", 4.0),
                ("minnesota", 4.0),
                ("colorado", 4.0),
                ("alabama", 3.5),
                ("kentucky", 3.5),
                ("oregon", 3.5),
            ]),
            regional_descriptors: terms(&[
                "statewide",
                "regional",
                "midwest",
                "west coast",
                "east coast",
                "rust belt",
                "multi state",
                "several states",
                "citywide",
                "county",
            ]),
        }
    }
}

/// One conflict family with its base weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictFamily {
    pub name: String,
    pub weight: f64,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictLexicon {
    pub families: Vec<ConflictFamily>,
    /// Settlement language that defuses conflict
    pub resolution: Vec<String>,
}

impl Default for ConflictLexicon {
    fn default() -> Self {
        let family = |name: &str, weight: f64, items: &[&str]| ConflictFamily {
            name: name.to_string(),
            weight,
            terms: terms(items),
        };
        Self {
            families: vec![
                family(
                    "labor_action",
                    2.0,
                    &[
                        "strike", "striking", "walkout", "picket", "lockout", "unioniz", "protest",
                        "rally", "boycott", "sick out",
                    ],
                ),
                family(
                    "legal_action",
                    1.5,
                    &[
                        "lawsuit",
                        "sued",
                        "sues",
                        "court",
                        "complaint",
                        "nlrb",
                        "unfair labor practice",
                        "injunction",
                        "class action",
                        "ruling",
                    ],
                ),
                family(
                    "injustice",
                    1.5,
                    &[
                        "unfair",
                        "exploit",
                        "wage theft",
                        "discriminat",
                        "retaliat",
                        "harass",
                        "abuse",
                        "underpaid",
                        "union busting",
                        "violation",
                    ],
                ),
                family(
                    "power_dynamics",
                    1.0,
                    &[
                        "ceo",
                        "executive",
                        "billionaire",
                        "management",
                        "corporate",
                        "shareholder",
                        "profits",
                        "boss",
                    ],
                ),
                family(
                    "struggle",
                    1.0,
                    &[
                        "struggle", "fight", "battle", "demand", "refuse", "standoff", "dispute",
                        "clash", "resist", "showdown",
                    ],
                ),
                family(
                    "safety",
                    1.5,
                    &[
                        "safety", "injur", "death", "died", "killed", "heat", "osha", "hazard",
                        "unsafe", "accident", "toxic",
                    ],
                ),
            ],
            resolution: terms(&[
                "settled",
                "settlement",
                "agreement reached",
                "tentative agreement",
                "deal reached",
                "reached a deal",
                "resolved",
                "ratified",
                "ended the strike",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoveltyLexicon {
    pub first_of_kind: Vec<String>,
    pub routine: Vec<String>,
}

impl Default for NoveltyLexicon {
    fn default() -> Self {
        Self {
            first_of_kind: terms(&[
                "first",
                "unprecedented",
                "historic",
                "never before",
                "record",
                "largest",
                "biggest",
                "escalat",
                "new wave",
            ]),
            routine: terms(&[
                "annual",
                "routine",
                "regular",
                "recurring",
                "again",
                "another",
                "monthly",
                "quarterly",
                "weekly",
                "yearly",
                "as usual",
                "ongoing",
            ]),
        }
    }
}

/// All scorer lexicons, as injected by configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicons {
    pub worker_impact: WorkerImpactLexicon,
    pub timeliness: TimelinessLexicon,
    pub verifiability: VerifiabilityLexicon,
    pub regional: RegionalLexicon,
    pub conflict: ConflictLexicon,
    pub novelty: NoveltyLexicon,
}
