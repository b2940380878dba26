use cinelog::error::CatalogError;
use cinelog::search::prefilter::{min_matches, passes, shared_char_count};
use cinelog::search::ranker::{MAX_NORMALIZED_DISTANCE, edit_distance, normalized_distance};
use cinelog::search::{CatalogEntry, CatalogSource, SearchOutcome, search, search_catalog};

const WORDS: &[&str] = &[
    "",
    "a",
    "heat",
    "heet",
    "se7en",
    "alien",
    "aliens",
    "alienz",
    "kitten",
    "sitting",
    "inception",
    "inzeption",
    "interstellar",
    "the matrix",
    "the matrx",
    "the dark knight",
    "fight club",
    "amélie",
    "amelie",
    "über",
    "uber",
    "memento",
    "memnto",
    "jaws",
    "jasw",
];

fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("Heat", 8.3),
        CatalogEntry::new("Se7en", 8.6),
        CatalogEntry::new("The Matrix", 8.7),
        CatalogEntry::new("Fight Club", 8.8),
        CatalogEntry::new("Inception", 8.8),
        CatalogEntry::new("Interstellar", 8.6),
    ]
}

/// Catalog source that counts how often it was asked for data.
struct CountingSource {
    entries: Vec<CatalogEntry>,
    fetches: usize,
}

impl CatalogSource for CountingSource {
    fn fetch_titles_and_ratings(&mut self) -> cinelog::error::Result<Vec<CatalogEntry>> {
        self.fetches += 1;
        Ok(self.entries.clone())
    }
}

#[test]
fn edit_distance_agrees_with_strsim() {
    for a in WORDS {
        for b in WORDS {
            assert_eq!(
                edit_distance(a, b),
                strsim::levenshtein(a, b),
                "distance between {a:?} and {b:?}"
            );
        }
    }
}

#[test]
fn edit_distance_is_a_metric_on_samples() {
    for a in WORDS {
        assert_eq!(edit_distance(a, a), 0);
        for b in WORDS {
            let d = edit_distance(a, b);
            assert_eq!(d, edit_distance(b, a));
            assert!(d <= a.chars().count().max(b.chars().count()));
            assert!(d >= a.chars().count().abs_diff(b.chars().count()));
            if a != b {
                assert!(d > 0);
            }
        }
    }
}

#[test]
fn normalized_distance_stays_in_unit_interval() {
    for a in WORDS {
        for b in WORDS {
            let nd = normalized_distance(a, b);
            assert!((0.0..=1.0).contains(&nd), "{a:?} vs {b:?} gave {nd}");
        }
    }
    assert_eq!(normalized_distance("", ""), 0.0);
}

#[test]
fn prefilter_never_drops_close_titles() {
    // Each edit removes at most one shared character, so a title within
    // `len - min_matches(len)` edits always clears the overlap gate.
    for query in WORDS {
        let len = query.chars().count();
        for title in WORDS {
            let d = edit_distance(query, title);
            assert!(shared_char_count(query, title) + d >= len);
            if d <= len - min_matches(len) {
                assert!(passes(query, title), "{query:?} should admit {title:?}");
            }
        }
    }
}

#[test]
fn prefilter_can_reject_titles_the_ranker_would_keep() {
    assert!(normalized_distance("inzeption", "interstellar") <= MAX_NORMALIZED_DISTANCE);
    assert!(!passes("inzeption", "interstellar"));
}

#[test]
fn substring_hits_keep_catalog_order() {
    let outcome = search("IN", &catalog()).unwrap();
    let SearchOutcome::Exact(hits) = outcome else {
        panic!("expected exact hits");
    };
    let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
    assert_eq!(titles, vec!["Inception", "Interstellar"]);
}

#[test]
fn typo_finds_inception_with_high_similarity() {
    let SearchOutcome::Fuzzy(hits) = search("inzeption", &catalog()).unwrap() else {
        panic!("expected fuzzy hits");
    };
    assert_eq!(hits[0].title, "Inception");
    assert_eq!(hits[0].rating, 8.8);
    assert!((hits[0].similarity - 8.0 / 9.0).abs() < 1e-9);
}

#[test]
fn fuzzy_results_are_ordered_and_bounded() {
    let SearchOutcome::Fuzzy(hits) = search("heet", &catalog()).unwrap() else {
        panic!("expected fuzzy hits");
    };
    assert_eq!(hits[0].title, "Heat");
    for pair in hits.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
    for hit in &hits {
        assert!(hit.similarity >= 1.0 - MAX_NORMALIZED_DISTANCE - 1e-9);
    }
    assert!(hits.iter().all(|h| h.title != "Fight Club"));
}

#[test]
fn unrelated_query_finds_nothing() {
    assert_eq!(search("xyz", &catalog()).unwrap(), SearchOutcome::NoMatch);
    assert_eq!(search("anything", &[]).unwrap(), SearchOutcome::NoMatch);
}

#[test]
fn blank_query_is_rejected_before_fetching() {
    let mut source = CountingSource {
        entries: catalog(),
        fetches: 0,
    };
    assert!(matches!(
        search_catalog(&mut source, "  \t"),
        Err(CatalogError::EmptyQuery)
    ));
    assert_eq!(source.fetches, 0);

    search_catalog(&mut source, "matrix").unwrap();
    assert_eq!(source.fetches, 1);
}
