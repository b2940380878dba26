//! Cheap character-overlap gate applied before edit distance scoring.

use std::collections::HashMap;

/// Fraction of the query's characters a candidate has to share, in tenths.
const MIN_OVERLAP_TENTHS: usize = 7;

/// Minimum shared character count for a query of `query_len` chars.
///
/// Equals `floor(0.7 * query_len)`, computed without floating point.
pub fn min_matches(query_len: usize) -> usize {
    query_len * MIN_OVERLAP_TENTHS / 10
}

fn char_histogram(s: &str) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Size of the multiset intersection of the characters of `a` and `b`.
pub fn shared_char_count(a: &str, b: &str) -> usize {
    let a_counts = char_histogram(a);
    let b_counts = char_histogram(b);
    a_counts
        .iter()
        .filter_map(|(c, &n)| b_counts.get(c).map(|&m| n.min(m)))
        .sum()
}

/// Whether `candidate` shares enough characters with `query` to be worth
/// scoring. Both strings are expected to be normalized to the same case.
///
/// This is a heuristic: it can reject titles the ranker would accept, and it
/// admits plenty the ranker will later drop.
pub fn passes(query: &str, candidate: &str) -> bool {
    shared_char_count(query, candidate) >= min_matches(query.chars().count())
}
