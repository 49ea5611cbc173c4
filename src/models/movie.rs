use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// MovieLens movie identifier
pub type MovieId = u32;

/// Separator between genre tokens in the source `genres` field
pub const GENRE_DELIMITER: char = '|';

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre tokens in source order
    pub genres: Vec<String>,
}

impl Movie {
    /// Creates a movie from its pipe-delimited genre field
    pub fn new(id: MovieId, title: impl Into<String>, genres: &str) -> Self {
        Self {
            id,
            title: title.into(),
            genres: parse_genres(genres),
        }
    }

    /// Genres rendered back into their pipe-delimited form
    pub fn genres_label(&self) -> String {
        self.genres.join("|")
    }
}

/// Splits a genre field into trimmed, non-empty tokens
pub fn parse_genres(field: &str) -> Vec<String> {
    field
        .split(GENRE_DELIMITER)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// The loaded movie catalog, in source row order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    positions: HashMap<MovieId, usize>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut positions = HashMap::with_capacity(movies.len());
        for (index, movie) in movies.iter().enumerate() {
            // first row wins on duplicate ids
            positions.entry(movie.id).or_insert(index);
        }

        Self { movies, positions }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    /// Movie at a row position
    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Row position of a movie id
    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn by_id(&self, id: MovieId) -> Option<&Movie> {
        self.position(id).and_then(|index| self.movies.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genres() {
        assert_eq!(
            parse_genres("Action|Adventure|Sci-Fi"),
            vec!["Action", "Adventure", "Sci-Fi"]
        );
    }

    #[test]
    fn test_parse_genres_empty_field() {
        assert!(parse_genres("").is_empty());
        assert!(parse_genres(" | ").is_empty());
    }

    #[test]
    fn test_genres_label_round_trips_source_form() {
        let movie = Movie::new(1, "Toy Story (1995)", "Adventure|Animation|Children");
        assert_eq!(movie.genres_label(), "Adventure|Animation|Children");
    }

    #[test]
    fn test_catalog_lookup_keeps_first_duplicate() {
        let catalog = Catalog::new(vec![
            Movie::new(1, "Toy Story (1995)", "Animation"),
            Movie::new(2, "Jumanji (1995)", "Adventure"),
            Movie::new(1, "Toy Story (duplicate)", "Animation"),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.position(1), Some(0));
        assert_eq!(catalog.by_id(1).unwrap().title, "Toy Story (1995)");
        assert_eq!(catalog.by_id(2).unwrap().title, "Jumanji (1995)");
        assert!(catalog.by_id(3).is_none());
    }
}
