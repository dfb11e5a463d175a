//! Static catalog of datasets, spectral indices and analysis workflows,
//! with weighted keyword matching against free-text analysis descriptions.
//!
//! Scoring per entry:
//! - +2 for each keyword found as a substring of the lower-cased text
//! - +1 for each use case with at least one word (longer than 3 chars) in the text
//! - +3 for each suitable index named in the text (case-insensitive)
//!
//! Entries scoring 0 are dropped; ties keep catalog order.

mod datasets;
mod indices;
mod workflows;

pub use datasets::{
    analysis_tips, get_data_source, recommend_datasets, sources_by_category, sources_by_keyword,
    sources_summary, DataCategory, DataSource, DataSourceSummary, DatasetRecommendation,
    DATA_SOURCES,
};
pub use indices::{get_index, match_indices, qgis_formula, Sensor, SpectralIndex, SPECTRAL_INDICES};
pub use workflows::{
    get_workflow, match_workflows, recommend_workflow, AnalysisCategory, AnalysisWorkflow,
    IndexDetails, TemporalRequirement, WorkflowRecommendation, WorkflowStep, ANALYSIS_WORKFLOWS,
};

use serde::Serialize;
use std::collections::HashSet;

/// Default number of matches returned
pub const DEFAULT_TOP_N: usize = 5;

/// Minimum word length that counts for use-case and fallback matching
const MIN_WORD_LEN: usize = 4;

/// A catalog record that can be scored against free text
pub trait Scorable {
    fn id(&self) -> &str;

    /// Lower-case keyword phrases
    fn keywords(&self) -> Vec<&str>;

    fn use_cases(&self) -> &[&str];

    fn suitable_indices(&self) -> &[&str];

    fn description(&self) -> &str;
}

/// A catalog entry with its score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMatch<'a, T> {
    pub entry: &'a T,
    pub score: u32,
    /// Found by single-word containment after weighted scoring matched nothing
    pub fallback: bool,
}

impl<T: Scorable> ScoredMatch<'_, T> {
    pub fn id(&self) -> &str {
        self.entry.id()
    }
}

/// Score one entry against already lower-cased text
pub fn score_entry<T: Scorable + ?Sized>(text_lower: &str, entry: &T) -> u32 {
    let keyword_hits = entry
        .keywords()
        .iter()
        .filter(|kw| text_lower.contains(&kw.to_lowercase()))
        .count() as u32;

    let use_case_hits = entry
        .use_cases()
        .iter()
        .filter(|uc| use_case_matches(text_lower, uc))
        .count() as u32;

    let index_hits = entry
        .suitable_indices()
        .iter()
        .filter(|idx| text_lower.contains(&idx.to_lowercase()))
        .count() as u32;

    keyword_hits * 2 + use_case_hits + index_hits * 3
}

/// Whether any significant word of the use case appears in the text
pub(crate) fn use_case_matches(text_lower: &str, use_case: &str) -> bool {
    use_case
        .to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .any(|word| text_lower.contains(word))
}

/// Rank entries by score, best first
pub fn recommend<'a, T: Scorable>(text: &str, entries: &'a [T], top_n: usize) -> Vec<ScoredMatch<'a, T>> {
    let text_lower = text.to_lowercase();

    let mut matches: Vec<ScoredMatch<'a, T>> = entries
        .iter()
        .filter_map(|entry| {
            let score = score_entry(&text_lower, entry);
            (score > 0).then_some(ScoredMatch {
                entry,
                score,
                fallback: false,
            })
        })
        .collect();

    // sort_by is stable, so equal scores keep catalog order
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.truncate(top_n);
    matches
}

/// Like [`recommend`], but when nothing scores, fall back to entries whose
/// keywords, use cases or description contain any significant word
pub fn recommend_with_fallback<'a, T: Scorable>(
    text: &str,
    entries: &'a [T],
    top_n: usize,
) -> Vec<ScoredMatch<'a, T>> {
    let matches = recommend(text, entries, top_n);
    if !matches.is_empty() {
        return matches;
    }

    let words = significant_words(text);
    if words.is_empty() {
        return matches;
    }
    tracing::debug!("No scored matches, falling back to word search: {:?}", words);

    entries
        .iter()
        .filter(|entry| words.iter().any(|word| entry_mentions(*entry, word)))
        .take(top_n)
        .map(|entry| ScoredMatch {
            entry,
            score: 0,
            fallback: true,
        })
        .collect()
}

/// Lower-cased words longer than 3 characters, deduplicated, in order
fn significant_words(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .filter(|word| seen.insert(word.to_string()))
        .map(str::to_string)
        .collect()
}

fn entry_mentions<T: Scorable + ?Sized>(entry: &T, word: &str) -> bool {
    entry.keywords().iter().any(|kw| kw.to_lowercase().contains(word))
        || entry
            .use_cases()
            .iter()
            .any(|uc| uc.to_lowercase().contains(word))
        || entry.description().to_lowercase().contains(word)
}
