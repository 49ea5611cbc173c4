use std::collections::HashSet;

use super::{ContentEngineKind, ContentSimilarity};
use crate::models::Catalog;

/// Set-overlap engine: Jaccard index of genre token sets
pub struct JaccardEngine {
    genre_sets: Vec<HashSet<String>>,
}

impl JaccardEngine {
    pub fn build(catalog: &Catalog) -> Self {
        let genre_sets = catalog
            .iter()
            .map(|movie| movie.genres.iter().cloned().collect())
            .collect();

        Self { genre_sets }
    }
}

/// |A ∩ B| / |A ∪ B|; two empty sets score 0
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

impl ContentSimilarity for JaccardEngine {
    fn movie_count(&self) -> usize {
        self.genre_sets.len()
    }

    fn similarity_row(&self, index: usize) -> Vec<f64> {
        let target = &self.genre_sets[index];
        self.genre_sets.iter().map(|other| jaccard(target, other)).collect()
    }

    fn kind(&self) -> ContentEngineKind {
        ContentEngineKind::Jaccard
    }
}
