use super::{CatalogEntry, FuzzyMatch};

/// Largest normalized distance a candidate may have and still be reported.
pub const MAX_NORMALIZED_DISTANCE: f64 = 0.7;

/// Levenshtein distance with unit costs, over Unicode scalar values.
///
/// `table[i][j]` holds the distance between the suffixes `a[i..]` and
/// `b[j..]`; the table is stored flat and lives only for this call.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    let width = n + 1;
    let mut table = vec![0usize; (m + 1) * width];

    for i in 0..=m {
        table[i * width + n] = m - i;
    }
    for j in 0..=n {
        table[m * width + j] = n - j;
    }

    for i in (0..m).rev() {
        for j in (0..n).rev() {
            table[i * width + j] = if a[i] == b[j] {
                table[(i + 1) * width + j + 1]
            } else {
                let delete = table[(i + 1) * width + j];
                let insert = table[i * width + j + 1];
                let replace = table[(i + 1) * width + j + 1];
                1 + delete.min(insert).min(replace)
            };
        }
    }

    table[0]
}

/// Edit distance scaled by the longer string's length, in `[0, 1]`.
pub fn normalized_distance(query: &str, title: &str) -> f64 {
    let longest = query.chars().count().max(title.chars().count());
    if longest == 0 {
        return 0.0;
    }
    edit_distance(query, title) as f64 / longest as f64
}

/// Scores every candidate against `query` and keeps those within
/// [`MAX_NORMALIZED_DISTANCE`], best first.
///
/// Candidates pair the lowercased title used for scoring with the catalog
/// entry to report. The sort is stable, so equal scores keep scan order.
pub fn rank<'a, I>(query: &str, candidates: I) -> Vec<FuzzyMatch>
where
    I: IntoIterator<Item = (&'a str, &'a CatalogEntry)>,
{
    let mut scored: Vec<(f64, &CatalogEntry)> = candidates
        .into_iter()
        .map(|(normalized_title, entry)| (normalized_distance(query, normalized_title), entry))
        .filter(|(distance, _)| *distance <= MAX_NORMALIZED_DISTANCE)
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    scored
        .into_iter()
        .map(|(distance, entry)| FuzzyMatch {
            title: entry.title.clone(),
            rating: entry.rating,
            similarity: 1.0 - distance,
        })
        .collect()
}
