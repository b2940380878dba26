//! Title search over a user's catalog.
//!
//! A query first runs as a case-insensitive substring match. Only when that
//! finds nothing does the approximate pipeline run: a character-overlap
//! [`prefilter`] followed by the edit distance [`ranker`].

pub mod prefilter;
pub mod ranker;

use crate::error::{CatalogError, Result};
use serde::Serialize;

/// A (title, rating) pair as handed over by storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub title: String,
    pub rating: f64,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, rating: f64) -> Self {
        Self {
            title: title.into(),
            rating,
        }
    }
}

/// An approximate hit; `similarity` is `1 - normalized distance`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuzzyMatch {
    pub title: String,
    pub rating: f64,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "results", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Titles containing the query, in catalog order.
    Exact(Vec<CatalogEntry>),
    /// Near matches, best first.
    Fuzzy(Vec<FuzzyMatch>),
    NoMatch,
}

/// Anything that can hand the search a snapshot of (title, rating) pairs.
pub trait CatalogSource {
    fn fetch_titles_and_ratings(&mut self) -> Result<Vec<CatalogEntry>>;
}

impl CatalogSource for Vec<CatalogEntry> {
    fn fetch_titles_and_ratings(&mut self) -> Result<Vec<CatalogEntry>> {
        Ok(self.clone())
    }
}

/// Trims and lowercases a query, rejecting one that ends up empty.
pub fn normalize_query(query: &str) -> Result<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyQuery);
    }
    Ok(trimmed.to_lowercase())
}

/// Searches `catalog` for `query`.
///
/// Case is folded internally, so callers may pass the query as typed.
pub fn search(query: &str, catalog: &[CatalogEntry]) -> Result<SearchOutcome> {
    let query = normalize_query(query)?;

    let lowered: Vec<String> = catalog.iter().map(|e| e.title.to_lowercase()).collect();

    let exact: Vec<CatalogEntry> = catalog
        .iter()
        .zip(&lowered)
        .filter(|(_, title)| title.contains(&query))
        .map(|(entry, _)| entry.clone())
        .collect();
    if !exact.is_empty() {
        tracing::debug!(query = %query, hits = exact.len(), "substring search matched");
        return Ok(SearchOutcome::Exact(exact));
    }

    let candidates: Vec<(&str, &CatalogEntry)> = lowered
        .iter()
        .map(String::as_str)
        .zip(catalog)
        .filter(|(title, _)| prefilter::passes(&query, title))
        .collect();
    tracing::debug!(
        query = %query,
        catalog = catalog.len(),
        candidates = candidates.len(),
        "running approximate search"
    );

    let matches = ranker::rank(&query, candidates);
    if matches.is_empty() {
        Ok(SearchOutcome::NoMatch)
    } else {
        Ok(SearchOutcome::Fuzzy(matches))
    }
}

/// Pulls a fresh snapshot from `source` and searches it.
pub fn search_catalog<S: CatalogSource + ?Sized>(
    source: &mut S,
    query: &str,
) -> Result<SearchOutcome> {
    normalize_query(query)?;
    let catalog = source.fetch_titles_and_ratings()?;
    search(query, &catalog)
}
