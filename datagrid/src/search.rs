//! Search box settings, validated search terms and client-side fuzzy filtering.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default search box placeholder.
pub const DEFAULT_SEARCH_PLACEHOLDER: &str = "Search...";

/// Search box text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    pub placeholder: String,
    pub label: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_SEARCH_PLACEHOLDER.to_string(),
            label: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placeholder.trim().is_empty() {
            return Err(ConfigError::EmptySearchPlaceholder);
        }
        Ok(())
    }
}

/// A search term the user submitted.
///
/// Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Accept `term` unless it is blank.
    pub fn new(term: impl Into<String>) -> Option<Self> {
        let term = term.into();
        if term.trim().is_empty() {
            return None;
        }
        Some(Self(term))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row matched by [`fuzzy_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMatch {
    /// Index of the row in the filtered sequence.
    pub index: usize,
    /// Match score (higher is better).
    pub score: u32,
}

/// Fuzzy-match `query` against the text of each row.
///
/// `haystacks` holds, per row, the texts to search (typically one per
/// visible column). A row scores as its best-matching text. Matching is
/// case-insensitive. Results are sorted best first, ties in row order.
/// An empty query matches every row with score 0.
pub fn fuzzy_filter<S: AsRef<str>>(query: &str, haystacks: &[Vec<S>]) -> Vec<RowMatch> {
    if query.trim().is_empty() {
        return (0..haystacks.len())
            .map(|index| RowMatch { index, score: 0 })
            .collect();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut matches: Vec<RowMatch> = haystacks
        .iter()
        .enumerate()
        .filter_map(|(index, texts)| {
            texts
                .iter()
                .filter_map(|text| {
                    let mut buf = Vec::new();
                    let haystack = Utf32Str::new(text.as_ref(), &mut buf);
                    pattern.score(haystack, &mut matcher)
                })
                .max()
                .map(|score| RowMatch { index, score })
        })
        .collect();

    // Stable, so equal scores stay in row order.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}
