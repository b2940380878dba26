//! Plain-text rendering of catalog data for the terminal.

use crate::search::{CatalogEntry, SearchOutcome};
use crate::stats::CatalogStats;
use crate::storage::Movie;

pub fn movie_line(movie: &Movie) -> String {
    t!(
        "movies.line",
        title = movie.title,
        year = movie.year,
        rating = movie.rating
    )
    .to_string()
}

/// Full listing with poster and note detail lines.
pub fn movie_listing(movies: &[Movie]) -> Vec<String> {
    let mut lines = vec![t!("movies.total", count = movies.len()).to_string()];
    for movie in movies {
        lines.push(movie_line(movie));
        if movie.has_poster() {
            lines.push(format!("    {}", t!("movies.poster", url = movie.poster_url)));
        }
        if !movie.note.trim().is_empty() {
            lines.push(format!("    {}", t!("movies.note", note = movie.note)));
        }
    }
    lines
}

pub fn movie_lines(movies: &[Movie]) -> Vec<String> {
    movies.iter().map(movie_line).collect()
}

fn entry_list(entries: &[CatalogEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({})", e.title, e.rating))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn stats_lines(stats: &CatalogStats) -> Vec<String> {
    vec![
        t!("stats.total", count = stats.count).to_string(),
        t!("stats.average", value = format!("{:.2}", stats.average)).to_string(),
        t!("stats.median", value = format!("{:.2}", stats.median)).to_string(),
        t!("stats.lowest", value = format!("{:.1}", stats.min)).to_string(),
        t!("stats.highest", value = format!("{:.1}", stats.max)).to_string(),
        t!("stats.best", movies = entry_list(&stats.best)).to_string(),
        t!("stats.worst", movies = entry_list(&stats.worst)).to_string(),
    ]
}

/// Exact hits carry no score; fuzzy hits show similarity to two decimals.
pub fn search_lines(query: &str, outcome: &SearchOutcome) -> Vec<String> {
    let query = query.trim().to_lowercase();
    match outcome {
        SearchOutcome::Exact(hits) => hits
            .iter()
            .map(|hit| format!("{}, {}", hit.title, hit.rating))
            .collect(),
        SearchOutcome::Fuzzy(hits) => {
            let mut lines = vec![t!("search.similar_header", query = query).to_string()];
            lines.extend(hits.iter().map(|hit| {
                t!(
                    "search.similar_line",
                    title = hit.title,
                    rating = hit.rating,
                    score = format!("{:.2}", hit.similarity)
                )
                .to_string()
            }));
            lines
        }
        SearchOutcome::NoMatch => vec![t!("search.no_match", query = query).to_string()],
    }
}
