use crate::models::{Catalog, Movie};

/// Weight of the containment bonus in the heuristic score
const CONTAINMENT_BONUS: i64 = 1000;

/// Resolves a free-text query to the best matching catalog entry
///
/// Matching order:
/// 1. case-insensitive exact title match, first in catalog order
/// 2. titles containing the query, or the whole catalog when none does,
///    ranked by [`match_score`]
///
/// Only an empty catalog yields `None`; an unrelated query still resolves to
/// whichever entry scores highest.
pub fn resolve_title<'a>(query: &str, catalog: &'a Catalog) -> Option<&'a Movie> {
    let query = query.to_lowercase();

    if let Some(exact) = catalog.iter().find(|m| m.title.to_lowercase() == query) {
        return Some(exact);
    }

    let containing: Vec<&Movie> = catalog
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&query))
        .collect();

    let candidates: Vec<&Movie> = if containing.is_empty() {
        tracing::debug!(query = %query, "No title contains query, scanning full catalog");
        catalog.iter().collect()
    } else {
        containing
    };

    let mut best: Option<(&Movie, i64)> = None;
    for movie in candidates {
        let score = match_score(&movie.title.to_lowercase(), &query);
        // strict comparison keeps the first of equal scores
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((movie, score));
        }
    }

    best.map(|(movie, _)| movie)
}

/// Heuristic closeness of a lowercased title to a lowercased query
///
/// `contains * 1000 + common_prefix_len - |len(title) - len(query)|`,
/// lengths counted in characters.
pub fn match_score(title: &str, query: &str) -> i64 {
    let bonus = if title.contains(query) {
        CONTAINMENT_BONUS
    } else {
        0
    };

    let title_len = title.chars().count() as i64;
    let query_len = query.chars().count() as i64;

    bonus + common_prefix_len(title, query) as i64 - (title_len - query_len).abs()
}

fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Movie::new(1, "Toy Story (1995)", "Adventure|Animation|Children|Comedy|Fantasy"),
            Movie::new(2, "Toy Story 2 (1999)", "Adventure|Animation|Children|Comedy|Fantasy"),
            Movie::new(3, "Jumanji (1995)", "Adventure|Children|Fantasy"),
            Movie::new(4, "Heat (1995)", "Action|Crime|Thriller"),
            Movie::new(5, "Heat", "Drama"),
        ])
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let catalog = catalog();
        let movie = resolve_title("jumanji (1995)", &catalog).unwrap();
        assert_eq!(movie.id, 3);
    }

    #[test]
    fn test_exact_match_beats_longer_containing_title() {
        let catalog = catalog();
        // "Heat (1995)" also contains "heat" but the exact entry wins
        let movie = resolve_title("HEAT", &catalog).unwrap();
        assert_eq!(movie.id, 5);
    }

    #[test]
    fn test_substring_prefers_closest_length() {
        let catalog = catalog();
        let movie = resolve_title("toy story", &catalog).unwrap();
        assert_eq!(movie.id, 1);
    }

    #[test]
    fn test_unrelated_query_falls_back_to_full_scan() {
        let catalog = catalog();
        let movie = resolve_title("zzzz", &catalog).unwrap();
        // no title contains the query; the shortest title is closest in length
        assert_eq!(movie.id, 5);
    }

    #[test]
    fn test_full_scan_uses_common_prefix() {
        let catalog = catalog();
        let movie = resolve_title("Jumanji 2", &catalog).unwrap();
        assert_eq!(movie.id, 3);
    }

    #[test]
    fn test_ties_go_to_first_in_catalog_order() {
        let catalog = Catalog::new(vec![
            Movie::new(10, "Alpha One", "Drama"),
            Movie::new(11, "Alpha Two", "Drama"),
        ]);
        let movie = resolve_title("alpha", &catalog).unwrap();
        assert_eq!(movie.id, 10);
    }

    #[test]
    fn test_empty_catalog_resolves_nothing() {
        let catalog = Catalog::default();
        assert!(resolve_title("anything", &catalog).is_none());
    }

    #[test]
    fn test_match_score() {
        assert_eq!(match_score("toy story (1995)", "toy story"), 1000 + 9 - 7);
        assert_eq!(match_score("heat", "hex"), 2 - 1);
    }
}
