use std::collections::HashMap;

use crate::{
    models::{Insights, MovieId, PopularMovie},
    services::loader::Dataset,
};

/// Number of entries in the popularity summary
pub const TOP_POPULAR: usize = 5;

/// Catalog and rating counts plus the five most-rated movies
pub fn summarize(dataset: &Dataset) -> Insights {
    Insights {
        total_movies: dataset.catalog.len(),
        total_ratings: dataset.ratings.len(),
        top5_popular: most_rated(dataset, TOP_POPULAR),
    }
}

/// The `n` movies with the most ratings
///
/// Ties keep catalog row order; movies missing from the catalog come after
/// catalog movies with the same count, in order of first rating.
pub fn most_rated(dataset: &Dataset, n: usize) -> Vec<PopularMovie> {
    let catalog = &dataset.catalog;

    // movie id -> (rating count, first row in the rating log)
    let mut counts: HashMap<MovieId, (usize, usize)> = HashMap::new();
    for (row, rating) in dataset.ratings.iter().enumerate() {
        counts.entry(rating.movie_id).or_insert((0, row)).0 += 1;
    }

    let mut ranked: Vec<(MovieId, usize, usize)> = counts
        .into_iter()
        .map(|(id, (count, first_row))| {
            let order = catalog
                .position(id)
                .unwrap_or_else(|| catalog.len() + first_row);
            (id, count, order)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(n)
        .map(|(id, count, _)| PopularMovie {
            movie_id: id,
            title: catalog
                .by_id(id)
                .map(|m| m.title.clone())
                .unwrap_or_else(|| id.to_string()),
            num_ratings: count,
        })
        .collect()
}
