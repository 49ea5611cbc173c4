//! Movie recommendations by genre similarity or rating correlation.
//!
//! The free functions below run against the process-wide [`Recommender`],
//! configured from the environment (`MOVIELENS_DATA_DIR`, `CONTENT_ENGINE`).
//! Embedders that want explicit ownership create their own `Recommender`.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{Dataset, Recommender};

use models::{Insights, RecommendationSet};

/// Catalog and rating log of the process-wide recommender
pub fn load() -> AppResult<&'static Dataset> {
    Recommender::global().load()
}

/// Dataset totals and the most-rated movies
pub fn summarize() -> AppResult<Insights> {
    Recommender::global().summarize()
}

/// Movies with the most similar genres to `title`
pub fn recommend_by_content(
    title: &str,
    k: usize,
    min_avg_rating: Option<f64>,
) -> AppResult<RecommendationSet> {
    Recommender::global().recommend_by_content(title, k, min_avg_rating)
}

/// Movies whose ratings correlate most with those of `title`
pub fn recommend_by_item_cf(
    title: &str,
    k: usize,
    min_avg_rating: Option<f64>,
) -> AppResult<RecommendationSet> {
    Recommender::global().recommend_by_item_cf(title, k, min_avg_rating)
}
