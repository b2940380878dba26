//! Rating statistics and random picks over a user's catalog.

use crate::search::CatalogEntry;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub count: usize,
    pub average: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Every entry sharing the highest rating.
    pub best: Vec<CatalogEntry>,
    /// Every entry sharing the lowest rating.
    pub worst: Vec<CatalogEntry>,
}

/// Median with the two middle values averaged for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    })
}

pub fn compute(entries: &[CatalogEntry]) -> Option<CatalogStats> {
    let ratings: Vec<f64> = entries.iter().map(|e| e.rating).collect();
    let median = median(&ratings)?;

    let count = ratings.len();
    let average = ratings.iter().sum::<f64>() / count as f64;
    let min = ratings.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ratings.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let with_rating = |target: f64| -> Vec<CatalogEntry> {
        entries
            .iter()
            .filter(|e| e.rating == target)
            .cloned()
            .collect()
    };

    Some(CatalogStats {
        count,
        average,
        median,
        min,
        max,
        best: with_rating(max),
        worst: with_rating(min),
    })
}

/// Picks one item uniformly; `None` for an empty slice.
pub fn pick_random<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    items.choose(rng)
}
