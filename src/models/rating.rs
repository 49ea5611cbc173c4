use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::MovieId;

/// MovieLens user identifier
pub type UserId = u32;

/// A single user's rating of a movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f64) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

/// Every rating in the dataset, in source row order
#[derive(Debug, Clone, Default)]
pub struct RatingLog {
    ratings: Vec<Rating>,
}

impl RatingLog {
    pub fn new(ratings: Vec<Rating>) -> Self {
        Self { ratings }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rating> {
        self.ratings.iter()
    }

    /// Mean rating per movie; movies nobody rated are absent
    pub fn average_ratings(&self) -> HashMap<MovieId, f64> {
        let mut sums: HashMap<MovieId, (f64, usize)> = HashMap::new();
        for r in &self.ratings {
            let entry = sums.entry(r.movie_id).or_insert((0.0, 0));
            entry.0 += r.rating;
            entry.1 += 1;
        }

        sums.into_iter()
            .map(|(id, (sum, count))| (id, sum / count as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_ratings() {
        let log = RatingLog::new(vec![
            Rating::new(1, 10, 4.0),
            Rating::new(2, 10, 3.0),
            Rating::new(1, 20, 5.0),
        ]);

        let avg = log.average_ratings();
        assert_eq!(avg.len(), 2);
        assert!((avg[&10] - 3.5).abs() < 1e-12);
        assert!((avg[&20] - 5.0).abs() < 1e-12);
        assert!(!avg.contains_key(&30));
    }

    #[test]
    fn test_empty_log() {
        let log = RatingLog::default();
        assert!(log.is_empty());
        assert!(log.average_ratings().is_empty());
    }
}
