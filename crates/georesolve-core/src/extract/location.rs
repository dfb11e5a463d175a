//! Location phrase extraction

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Phrase after a preposition, stopped by the next temporal or
    /// conjunction keyword.
    static ref BOUNDED_LOCATION_RE: Regex = Regex::new(
        r"\b(?i:for|of|in|over|around|near)\s+(\p{Lu}[\p{L}\s,'.-]*?)(?:\s+(?i:from|last|past|with|during|between|since|before|after|using|under|below|on|in\s+(?:\d{4}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\p{L}*))\b|\s*[;:!?()]|$)"
    )
    .unwrap();
    static ref OPEN_LOCATION_RE: Regex =
        Regex::new(r"\b(?i:for|of|in|over|around|near)\s+(\p{Lu}[\p{L}\s,'.-]*)").unwrap();
}

/// Words that follow a preposition but never name a place
const STOPWORDS: &[&str] = &[
    "the", "last", "past", "month", "week", "year", "today", "yesterday", "january", "february",
    "march", "april", "may", "june", "july", "august", "september", "october", "november",
    "december", "sentinel", "landsat", "modis", "images", "imagery", "data", "scenes",
];

/// Extract a place name from original-case text
pub fn extract_location(text: &str) -> Option<String> {
    BOUNDED_LOCATION_RE
        .captures_iter(text)
        .chain(OPEN_LOCATION_RE.captures_iter(text))
        .filter_map(|caps| caps.get(1).map(|m| clean(m.as_str())))
        .find(|candidate| is_place(candidate))
}

fn clean(raw: &str) -> String {
    sentence_head(raw)
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '-' | '\'') || c.is_whitespace())
        .to_string()
}

/// Cut at the first sentence break. A dot after a word of at most three
/// letters ("St. Louis", "Mt. Fuji") is an abbreviation and does not end it.
fn sentence_head(raw: &str) -> &str {
    for (idx, _) in raw.match_indices('.') {
        let followed_by_space = raw[idx + 1..].starts_with(char::is_whitespace);
        if !followed_by_space {
            continue;
        }
        let word = raw[..idx]
            .rsplit(|c: char| !c.is_alphabetic())
            .next()
            .unwrap_or("");
        if word.chars().count() > 3 {
            return &raw[..idx];
        }
    }
    raw
}

fn is_place(candidate: &str) -> bool {
    if candidate.chars().count() <= 2 {
        return false;
    }
    let lower = candidate.to_lowercase();
    !STOPWORDS.contains(&lower.as_str())
}
