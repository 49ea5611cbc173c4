use std::fmt::Display;

use serde::{Deserialize, Serialize};

mod movie;
mod rating;

pub use movie::{parse_genres, Catalog, Movie, MovieId, GENRE_DELIMITER};
pub use rating::{Rating, RatingLog, UserId};

/// Ranking strategy used to produce recommendations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Genre-based content similarity
    Content,
    /// Item-based collaborative filtering on rating correlations
    ItemCf,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Content => write!(f, "content"),
            Strategy::ItemCf => write!(f, "item_cf"),
        }
    }
}

/// One recommended movie with its similarity score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    /// Pipe-delimited genre field
    pub genres: String,
    /// Similarity or correlation, rounded to 4 decimals
    pub score: f64,
}

/// Result of a recommendation query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationSet {
    /// Catalog title the query resolved to
    pub matched_title: String,
    pub strategy: Strategy,
    /// Ordered by descending score
    pub recommendations: Vec<Recommendation>,
}

/// A movie ranked by number of ratings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub num_ratings: usize,
}

/// Dataset-level summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insights {
    pub total_movies: usize,
    pub total_ratings: usize,
    pub top5_popular: Vec<PopularMovie>,
}
