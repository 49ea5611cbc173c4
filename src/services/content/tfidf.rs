use std::collections::{BTreeMap, BTreeSet};

use super::{ContentEngineKind, ContentSimilarity};
use crate::models::Catalog;

/// Sparse vector as `(term id, weight)` pairs sorted by term id
type SparseVector = Vec<(usize, f64)>;

/// Weighted-vector engine: cosine similarity of L2-normalized TF-IDF vectors
///
/// Genre tokens are lowercased. Weights use raw term counts and the smoothed
/// inverse document frequency `ln((1 + n) / (1 + df)) + 1`.
pub struct TfIdfEngine {
    vectors: Vec<SparseVector>,
    /// Term id -> `(movie index, weight)` for every movie carrying the term
    postings: Vec<Vec<(usize, f64)>>,
    vocabulary: Vec<String>,
}

impl TfIdfEngine {
    pub fn build(catalog: &Catalog) -> Self {
        let documents: Vec<Vec<String>> = catalog
            .iter()
            .map(|movie| movie.genres.iter().map(|g| g.to_lowercase()).collect())
            .collect();

        let vocabulary: Vec<String> = documents
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let term_ids: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(id, term)| (term.as_str(), id))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        let mut term_counts: Vec<BTreeMap<usize, usize>> = Vec::with_capacity(documents.len());
        for document in &documents {
            let mut counts = BTreeMap::new();
            for term in document {
                *counts.entry(term_ids[term.as_str()]).or_insert(0) += 1;
            }
            for term in counts.keys() {
                document_frequency[*term] += 1;
            }
            term_counts.push(counts);
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|df| ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        let vectors: Vec<SparseVector> = term_counts
            .into_iter()
            .map(|counts| {
                let mut vector: SparseVector = counts
                    .into_iter()
                    .map(|(term, count)| (term, count as f64 * idf[term]))
                    .collect();
                normalize(&mut vector);
                vector
            })
            .collect();

        let mut postings = vec![Vec::new(); vocabulary.len()];
        for (index, vector) in vectors.iter().enumerate() {
            for &(term, weight) in vector {
                postings[term].push((index, weight));
            }
        }

        Self {
            vectors,
            postings,
            vocabulary,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

fn normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in vector.iter_mut() {
            *w /= norm;
        }
    }
}

impl ContentSimilarity for TfIdfEngine {
    fn movie_count(&self) -> usize {
        self.vectors.len()
    }

    fn similarity_row(&self, index: usize) -> Vec<f64> {
        let mut row = vec![0.0; self.vectors.len()];
        for &(term, weight) in &self.vectors[index] {
            for &(other, other_weight) in &self.postings[term] {
                row[other] += weight * other_weight;
            }
        }

        for score in row.iter_mut() {
            *score = score.min(1.0);
        }
        row
    }

    fn kind(&self) -> ContentEngineKind {
        ContentEngineKind::TfIdf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Movie::new(1, "Toy Story (1995)", "Animation|Comedy"),
            Movie::new(2, "Jumanji (1995)", "Adventure|Fantasy"),
            Movie::new(3, "Shrek (2001)", "Animation|Comedy|Fantasy"),
            Movie::new(4, "Untitled", ""),
        ])
    }

    #[test]
    fn test_vocabulary_is_lowercased_and_sorted() {
        let engine = TfIdfEngine::build(&catalog());
        assert_eq!(
            engine.vocabulary(),
            &["adventure", "animation", "comedy", "fantasy"]
        );
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let engine = TfIdfEngine::build(&catalog());
        for vector in &engine.vectors[..3] {
            let norm: f64 = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
        assert!(engine.vectors[3].is_empty());
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let engine = TfIdfEngine::build(&catalog());
        let row = engine.similarity_row(0);
        assert!((row[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_values() {
        let engine = TfIdfEngine::build(&catalog());
        let row = engine.similarity_row(0);

        // n = 4; animation/comedy/fantasy appear twice, adventure once
        let shared = (5.0f64 / 3.0).ln() + 1.0;
        let expected = 2.0 * shared * shared / ((2.0 * shared * shared).sqrt() * (3.0 * shared * shared).sqrt());
        assert!((row[2] - expected).abs() < 1e-12);
        assert_eq!(row[1], 0.0);
        assert_eq!(row[3], 0.0);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let engine = TfIdfEngine::build(&catalog());
        let from_toy_story = engine.similarity_row(0)[2];
        let from_shrek = engine.similarity_row(2)[0];
        assert!((from_toy_story - from_shrek).abs() < 1e-12);
    }
}
