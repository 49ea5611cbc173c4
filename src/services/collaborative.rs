//! Item-based collaborative filtering
//!
//! Builds a user x movie rating matrix, mean-centres every user's ratings and
//! correlates movie columns pairwise (Pearson over co-rating users).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

use crate::models::{MovieId, RatingLog, UserId};

/// Co-rating users required for a defined coefficient
pub const MIN_OVERLAP: usize = 2;

/// Variances at or below this are treated as zero
const VARIANCE_EPSILON: f64 = 1e-12;

/// Running sums over the users who rated both movies of a pair
#[derive(Debug, Clone, Copy, Default)]
struct PairStats {
    n: usize,
    sum_x: f64,
    sum_y: f64,
    sum_xx: f64,
    sum_yy: f64,
    sum_xy: f64,
}

impl PairStats {
    fn add(&mut self, x: f64, y: f64) {
        self.n += 1;
        self.sum_x += x;
        self.sum_y += y;
        self.sum_xx += x * x;
        self.sum_yy += y * y;
        self.sum_xy += x * y;
    }

    /// Pearson coefficient, `None` with too few overlaps or a constant column
    fn pearson(&self) -> Option<f64> {
        if self.n < MIN_OVERLAP {
            return None;
        }

        let n = self.n as f64;
        let var_x = self.sum_xx - self.sum_x * self.sum_x / n;
        let var_y = self.sum_yy - self.sum_y * self.sum_y / n;
        if var_x <= VARIANCE_EPSILON || var_y <= VARIANCE_EPSILON {
            return None;
        }

        let cov = self.sum_xy - self.sum_x * self.sum_y / n;
        Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
    }
}

/// Item-item Pearson correlations, keyed by movie id
///
/// Symmetric; self pairs and undefined coefficients are never stored. Each
/// row is kept sorted by descending correlation, ties by ascending movie id.
#[derive(Debug, Clone, Default)]
pub struct ItemSimilarityMatrix {
    rows: HashMap<MovieId, Vec<(MovieId, f64)>>,
}

impl ItemSimilarityMatrix {
    pub fn build(ratings: &RatingLog) -> Self {
        let start = Instant::now();

        // duplicate (user, movie) ratings collapse to their mean
        let mut cells: BTreeMap<(UserId, MovieId), (f64, usize)> = BTreeMap::new();
        for r in ratings.iter() {
            let cell = cells.entry((r.user_id, r.movie_id)).or_insert((0.0, 0));
            cell.0 += r.rating;
            cell.1 += 1;
        }

        let movie_ids: Vec<MovieId> = cells
            .keys()
            .map(|(_, movie)| *movie)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns: HashMap<MovieId, usize> = movie_ids
            .iter()
            .enumerate()
            .map(|(column, id)| (*id, column))
            .collect();

        // per-user rows of (column, rating), users in ascending id order
        let mut user_rows: Vec<Vec<(usize, f64)>> = Vec::new();
        let mut current_user: Option<UserId> = None;
        for (&(user, movie), &(sum, count)) in &cells {
            if current_user != Some(user) {
                user_rows.push(Vec::new());
                current_user = Some(user);
            }
            if let Some(row) = user_rows.last_mut() {
                row.push((columns[&movie], sum / count as f64));
            }
        }

        for row in user_rows.iter_mut() {
            let mean = row.iter().map(|(_, v)| v).sum::<f64>() / row.len() as f64;
            for (_, value) in row.iter_mut() {
                *value -= mean;
            }
        }

        let mut movie_columns: Vec<Vec<(usize, f64)>> = vec![Vec::new(); movie_ids.len()];
        for (user, row) in user_rows.iter().enumerate() {
            for &(column, value) in row {
                movie_columns[column].push((user, value));
            }
        }

        let mut rows: HashMap<MovieId, Vec<(MovieId, f64)>> = HashMap::new();
        let mut stats = vec![PairStats::default(); movie_ids.len()];
        let mut touched: Vec<usize> = Vec::new();
        let mut defined_pairs = 0usize;

        for (i, column) in movie_columns.iter().enumerate() {
            for &(user, x) in column {
                for &(j, y) in &user_rows[user] {
                    if j <= i {
                        continue;
                    }
                    if stats[j].n == 0 {
                        touched.push(j);
                    }
                    stats[j].add(x, y);
                }
            }

            for &j in &touched {
                if let Some(r) = stats[j].pearson() {
                    rows.entry(movie_ids[i]).or_default().push((movie_ids[j], r));
                    rows.entry(movie_ids[j]).or_default().push((movie_ids[i], r));
                    defined_pairs += 1;
                }
                stats[j] = PairStats::default();
            }
            touched.clear();
        }

        for row in rows.values_mut() {
            row.sort_by(|a, b| match b.1.total_cmp(&a.1) {
                Ordering::Equal => a.0.cmp(&b.0),
                other => other,
            });
        }

        tracing::info!(
            users = user_rows.len(),
            movies = movie_ids.len(),
            pairs = defined_pairs,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Item similarity matrix built"
        );

        Self { rows }
    }

    /// Movies correlated with `movie_id`, highest correlation first
    ///
    /// Empty when the movie has no defined correlation with anything.
    pub fn neighbors(&self, movie_id: MovieId) -> Vec<(MovieId, f64)> {
        self.rows.get(&movie_id).cloned().unwrap_or_default()
    }

    /// Coefficient of a single pair, if defined
    pub fn correlation(&self, a: MovieId, b: MovieId) -> Option<f64> {
        self.rows
            .get(&a)?
            .iter()
            .find(|(other, _)| *other == b)
            .map(|(_, r)| *r)
    }

    /// Number of movies with at least one defined correlation
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
