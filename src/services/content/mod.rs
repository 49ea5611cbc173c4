//! Genre-based content similarity
//!
//! A [`ContentModel`] wraps one of two interchangeable engines behind the
//! [`ContentSimilarity`] trait:
//! - TF-IDF weighted genre vectors compared by cosine similarity (`tfidf` feature)
//! - Jaccard overlap of genre sets, always available
//!
//! Both produce a full similarity row for a movie; the model turns that row
//! into a ranked candidate list that never contains the movie itself.

use std::cmp::Ordering;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::models::Catalog;

mod jaccard;
#[cfg(feature = "tfidf")]
mod tfidf;

pub use jaccard::JaccardEngine;
#[cfg(feature = "tfidf")]
pub use tfidf::TfIdfEngine;

/// Score assigned to a movie compared with itself, below any valid similarity
pub const SELF_SIMILARITY: f64 = -1.0;

/// Available content similarity engines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentEngineKind {
    TfIdf,
    Jaccard,
}

impl Default for ContentEngineKind {
    fn default() -> Self {
        if cfg!(feature = "tfidf") {
            ContentEngineKind::TfIdf
        } else {
            ContentEngineKind::Jaccard
        }
    }
}

/// Pairwise genre similarity over a catalog
///
/// Rows are index-aligned with the catalog the engine was built from.
#[cfg_attr(test, mockall::automock)]
pub trait ContentSimilarity: Send + Sync {
    /// Number of movies the engine was built over
    fn movie_count(&self) -> usize;

    /// Similarity of the movie at `index` to every movie, itself included
    fn similarity_row(&self, index: usize) -> Vec<f64>;

    fn kind(&self) -> ContentEngineKind;
}

/// Content model built once per catalog
pub struct ContentModel {
    engine: Box<dyn ContentSimilarity>,
}

impl std::fmt::Debug for ContentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentModel")
            .field("kind", &self.engine.kind())
            .field("movies", &self.engine.movie_count())
            .finish()
    }
}

impl ContentModel {
    /// Builds the requested engine over the catalog
    ///
    /// Requesting TF-IDF from a build without the `tfidf` feature falls back to
    /// Jaccard.
    pub fn build(catalog: &Catalog, kind: ContentEngineKind) -> Self {
        let start = Instant::now();

        let engine: Box<dyn ContentSimilarity> = match kind {
            #[cfg(feature = "tfidf")]
            ContentEngineKind::TfIdf => Box::new(TfIdfEngine::build(catalog)),
            #[cfg(not(feature = "tfidf"))]
            ContentEngineKind::TfIdf => {
                tracing::warn!("TF-IDF engine not compiled in, using Jaccard");
                Box::new(JaccardEngine::build(catalog))
            }
            ContentEngineKind::Jaccard => Box::new(JaccardEngine::build(catalog)),
        };

        tracing::info!(
            engine = ?engine.kind(),
            movies = engine.movie_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Content model built"
        );

        Self { engine }
    }

    pub fn from_engine(engine: Box<dyn ContentSimilarity>) -> Self {
        Self { engine }
    }

    pub fn kind(&self) -> ContentEngineKind {
        self.engine.kind()
    }

    /// The `candidate_count` movies most similar to the one at `index`
    ///
    /// Sorted by descending score, ties by ascending index. The movie itself is
    /// never included.
    pub fn similar(&self, index: usize, candidate_count: usize) -> Vec<(usize, f64)> {
        if index >= self.engine.movie_count() {
            return Vec::new();
        }

        let mut row = self.engine.similarity_row(index);
        row[index] = SELF_SIMILARITY;

        top_candidates(&row, index, candidate_count)
    }
}

/// Highest-scoring entries of a similarity row, excluding `exclude`
pub fn top_candidates(row: &[f64], exclude: usize, count: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|(i, _)| *i != exclude)
        .collect();

    ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    ranked.truncate(count);
    ranked
}
