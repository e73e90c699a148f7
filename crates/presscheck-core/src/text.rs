//! Text normalization and token extraction
//!
//! Every stage works from the same reductions of free text: a normalized
//! form for term matching, stop-word-filtered keyword sets, numeric tokens,
//! and date tokens.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Common English words that carry no topical signal.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "being", "but", "by", "can", "could", "did", "do", "does", "for", "from",
    "had", "has", "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "more", "most", "new", "no", "not", "now", "of", "on", "one", "or", "our", "out",
    "over", "said", "says", "she", "so", "some", "than", "that", "the", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "to", "under", "up", "us", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "will", "with", "would", "you",
];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Title normalization for duplicate detection: lower-case, strip
/// punctuation, collapse whitespace.
pub fn normalize_title(title: &str) -> String {
    let stripped: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Edit-distance similarity ratio between two already-normalized titles (0-1)
pub fn title_similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Lower-case and replace punctuation with spaces, keeping word boundaries.
pub fn normalize_text(text: &str) -> String {
    let spaced: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(|c| c.to_lowercase())
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text prepared for word-start term matching.
///
/// A term matches when it begins at a word boundary, so the stem `unioniz`
/// matches "unionize" and "unionization" while `national` does not match
/// "international".
#[derive(Debug, Clone)]
pub struct MatchText {
    padded: String,
}

impl MatchText {
    pub fn new(text: &str) -> Self {
        Self {
            padded: format!(" {} ", normalize_text(text)),
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        let term = normalize_text(term);
        if term.is_empty() {
            return false;
        }
        self.padded.contains(&format!(" {}", term))
    }

    /// Terms from `terms` present in the text, in list order
    pub fn hits<'a>(&self, terms: &'a [String]) -> Vec<&'a str> {
        terms
            .iter()
            .filter(|t| self.contains(t))
            .map(|t| t.as_str())
            .collect()
    }

    pub fn any(&self, terms: &[String]) -> bool {
        terms.iter().any(|t| self.contains(t))
    }

    /// Normalized words
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.padded.split_whitespace()
    }
}

/// Stop-word-filtered alphabetic keywords of at least `min_len` characters.
pub fn keywords(text: &str, min_len: usize) -> BTreeSet<String> {
    normalize_text(text)
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_len)
        .filter(|w| w.chars().all(|c| c.is_alphabetic()))
        .filter(|w| !is_stop_word(w))
        .map(|w| w.to_string())
        .collect()
}

/// Jaccard similarity of two keyword sets (0 when both are empty)
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Numeric figures mentioned in the text.
///
/// Thousands separators are removed (`2,654` → `2654`), ranges split into
/// their parts (`2654-2131`), and four-digit years are left to
/// [`date_tokens`].
pub fn numeric_tokens(text: &str) -> BTreeSet<String> {
    raw_numbers(text)
        .into_iter()
        .filter(|n| !is_year(n))
        .collect()
}

/// Date mentions: ISO dates, "<month> <day>" pairs, and four-digit years.
pub fn date_tokens(text: &str) -> BTreeSet<String> {
    let mut tokens = BTreeSet::new();

    for word in text.split_whitespace() {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric());
        if is_iso_date(word) {
            tokens.insert(word.to_string());
        }
    }

    let normalized = normalize_text(text);
    let words: Vec<&str> = normalized.split_whitespace().collect();
    for (i, word) in words.iter().enumerate() {
        if MONTHS.contains(word) {
            if let Some(next) = words.get(i + 1) {
                if let Ok(day) = next.parse::<u8>() {
                    if (1..=31).contains(&day) {
                        tokens.insert(format!("{} {}", word, day));
                    }
                }
            }
        }
    }

    for n in raw_numbers(text) {
        if is_year(&n) {
            tokens.insert(n);
        }
    }
    tokens
}

/// Split on sentence-ending punctuation followed by whitespace or end of text.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = text.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.get(i + 1).map_or(true, |n| n.is_whitespace());
            if at_boundary {
                let sentence = current.trim();
                if !sentence.is_empty() {
                    out.push(sentence.to_string());
                }
                current.clear();
            }
        }
    }
    let rest = current.trim();
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

/// Dollar amounts written as `$15`, `$2.5 million`, `$1,200`.
pub fn dollar_amounts(text: &str) -> Vec<f64> {
    let mut amounts = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '$' {
            let mut digits = String::new();
            let mut j = i + 1;
            while j < chars.len() && (chars[j].is_ascii_digit() || chars[j] == ',' || chars[j] == '.')
            {
                if chars[j] != ',' {
                    digits.push(chars[j]);
                }
                j += 1;
            }
            if let Ok(value) = digits.trim_end_matches('.').parse::<f64>() {
                amounts.push(value);
            }
            i = j;
        } else {
            i += 1;
        }
    }
    amounts
}

/// Counts that directly precede one of `nouns` ("1,200 nurses", "300 workers").
///
/// One intervening word is allowed ("400 warehouse workers").
pub fn counts_before(text: &str, nouns: &[String]) -> Vec<u64> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != ',')
                .trim_matches(',')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let is_noun = |w: &str| nouns.iter().any(|n| w.starts_with(n.as_str()));

    let mut counts = Vec::new();
    for (i, word) in words.iter().enumerate() {
        let Ok(n) = word.replace(',', "").parse::<u64>() else {
            continue;
        };
        let next = words.get(i + 1).map(|w| is_noun(w)).unwrap_or(false);
        let after = words.get(i + 2).map(|w| is_noun(w)).unwrap_or(false);
        if next || after {
            counts.push(n);
        }
    }
    counts
}

/// Capitalized words that do not start a sentence; a cheap named-entity signal.
pub fn named_entity_count(text: &str) -> usize {
    let mut count = 0;
    let mut sentence_start = true;
    for word in text.split_whitespace() {
        let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
        if !sentence_start
            && trimmed.chars().next().is_some_and(|c| c.is_uppercase())
            && trimmed.chars().count() > 1
        {
            count += 1;
        }
        sentence_start = word.ends_with(['.', '!', '?']);
    }
    count
}

/// Extract the host from a URL: no scheme, port, path, or leading `www.`.
pub fn url_host(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .rsplit('@')
        .next()
        .unwrap_or("");
    let host = host.split(':').next().unwrap_or("").to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Whether `host` equals `domain` or is a subdomain of it.
///
/// Entries starting with a dot (".gov") match by suffix.
pub fn host_matches(host: &str, domain: &str) -> bool {
    if domain.starts_with('.') {
        return host.ends_with(domain);
    }
    host == domain || host.ends_with(&format!(".{}", domain))
}

fn raw_numbers(text: &str) -> Vec<String> {
    let mut numbers = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            let mut token = String::new();
            let mut j = i;
            while j < chars.len() {
                let c = chars[j];
                let separator = (c == ',' || c == '.')
                    && chars.get(j + 1).is_some_and(|n| n.is_ascii_digit());
                if c.is_ascii_digit() {
                    token.push(c);
                } else if separator {
                    if c == '.' {
                        token.push(c);
                    }
                } else {
                    break;
                }
                j += 1;
            }
            // ISO dates are date tokens, not figures
            if !is_iso_date_at(&chars, i) {
                numbers.push(token);
            } else {
                j = i + 10;
            }
            i = j;
        } else {
            i += 1;
        }
    }
    numbers
}

fn is_year(token: &str) -> bool {
    token.len() == 4
        && token.chars().all(|c| c.is_ascii_digit())
        && (token.starts_with("19") || token.starts_with("20"))
}

fn is_iso_date(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    chars.len() == 10 && is_iso_date_at(&chars, 0)
}

fn is_iso_date_at(chars: &[char], start: usize) -> bool {
    let Some(slice) = chars.get(start..start + 10) else {
        return false;
    };
    slice.iter().enumerate().all(|(k, c)| match k {
        4 | 7 => *c == '-',
        _ => c.is_ascii_digit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn stop_words_are_sorted_for_binary_search() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort();
        assert_eq!(sorted, STOP_WORDS);
        assert!(is_stop_word("the"));
        assert!(!is_stop_word("strike"));
    }

    #[test]
    fn normalize_title_strips_punctuation() {
        assert_eq!(
            normalize_title("  Amazon workers in NYC vote to unionize! "),
            "amazon workers in nyc vote to unionize"
        );
        assert_eq!(normalize_title("A  B\tC"), "a b c");
    }

    #[test]
    fn match_text_uses_word_start_boundaries() {
        let text = MatchText::new("Workers vote to unionize at the International depot");
        assert!(text.contains("unioniz"));
        assert!(text.contains("vote to"));
        assert!(!text.contains("national"));
        assert!(!text.contains("ionize"));
    }

    #[test]
    fn keywords_filter_stop_words_and_short_words() {
        let kw = keywords("The 500 workers voted to strike at the plant", 3);
        assert_eq!(kw, set(&["plant", "strike", "voted", "workers"]));
        let kw4 = keywords("The big vote at the plant", 4);
        assert_eq!(kw4, set(&["plant", "vote"]));
    }

    #[test]
    fn jaccard_similarity() {
        let a = set(&["strike", "workers", "plant"]);
        let b = set(&["strike", "workers", "union"]);
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(jaccard(&BTreeSet::new(), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn numeric_tokens_handle_separators_ranges_and_years() {
        assert_eq!(numeric_tokens("The vote was 2654-2131."), set(&["2131", "2654"]));
        assert_eq!(numeric_tokens("1,200 nurses earn $22.50"), set(&["1200", "22.50"]));
        assert_eq!(numeric_tokens("In 2024, 500 workers"), set(&["500"]));
        assert_eq!(numeric_tokens("Filed 2024-03-05 with 40 pages"), set(&["40"]));
    }

    #[test]
    fn date_tokens_find_months_iso_and_years() {
        let tokens = date_tokens("On March 5, 2024 the board ruled; appeal filed 2024-04-01.");
        assert!(tokens.contains("march 5"));
        assert!(tokens.contains("2024"));
        assert!(tokens.contains("2024-04-01"));
    }

    #[test]
    fn sentence_split_keeps_decimals() {
        let s = sentences("Wages rose 3.5 percent. Workers said it was not enough! Why?");
        assert_eq!(
            s,
            vec![
                "Wages rose 3.5 percent.",
                "Workers said it was not enough!",
                "Why?"
            ]
        );
    }

    #[test]
    fn dollar_amounts_and_counts() {
        assert_eq!(dollar_amounts("raise to $15 and then $1,200."), vec![15.0, 1200.0]);
        let nouns = vec!["worker".to_string(), "nurse".to_string()];
        assert_eq!(
            counts_before("About 1,200 nurses and 300 warehouse workers walked out", &nouns),
            vec![1200, 300]
        );
    }

    #[test]
    fn named_entities_skip_sentence_starts() {
        assert_eq!(named_entity_count("Workers at Amazon joined the ALU."), 2);
        assert_eq!(named_entity_count("The vote passed."), 0);
    }

    #[test]
    fn url_host_extraction() {
        assert_eq!(url_host("https://www.NLRB.gov/case/29-RC-288020"), "nlrb.gov");
        assert_eq!(url_host("http://apnews.com:443/article?id=1"), "apnews.com");
        assert_eq!(url_host("reddit.com/r/antiwork"), "reddit.com");
        assert!(host_matches("news.bbc.co.uk", "bbc.co.uk"));
        assert!(host_matches("bls.gov", ".gov"));
        assert!(!host_matches("notreuters.com", "reuters.com"));
    }
}
