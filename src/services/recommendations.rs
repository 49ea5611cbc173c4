use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Insights, Movie, MovieId, Recommendation, RecommendationSet, Strategy},
    services::{
        collaborative::ItemSimilarityMatrix,
        content::ContentModel,
        insights,
        loader::{self, Dataset},
        title_search::resolve_title,
    },
};

/// Smallest candidate pool requested from the content model
const MIN_CONTENT_CANDIDATES: usize = 10;

/// Content candidates requested per wanted result, leaving room for filtering
const CONTENT_OVERSAMPLING: usize = 3;

static GLOBAL: OnceCell<Recommender> = OnceCell::new();

/// Owns the dataset and the models derived from it
///
/// Every cache is filled at most once, on first use, and kept for the lifetime
/// of the `Recommender`. Concurrent first access blocks on the cell until the
/// initializing caller finishes; a failed initialization is not stored, so the
/// next call tries again.
pub struct Recommender {
    config: Config,
    dataset: OnceCell<Dataset>,
    content: OnceCell<ContentModel>,
    item_similarity: OnceCell<ItemSimilarityMatrix>,
    average_ratings: OnceCell<HashMap<MovieId, f64>>,
}

impl Recommender {
    /// Creates a recommender that loads its data from `config` on first use
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dataset: OnceCell::new(),
            content: OnceCell::new(),
            item_similarity: OnceCell::new(),
            average_ratings: OnceCell::new(),
        }
    }

    /// Creates a recommender over an already loaded dataset
    pub fn from_dataset(dataset: Dataset, config: Config) -> Self {
        Self {
            dataset: OnceCell::with_value(dataset),
            ..Self::new(config)
        }
    }

    /// Process-wide instance configured from the environment
    pub fn global() -> &'static Recommender {
        GLOBAL.get_or_init(|| {
            let config = Config::from_env().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default configuration");
                Config::default()
            });
            Recommender::new(config)
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Catalog and rating log, loaded on first call
    pub fn load(&self) -> AppResult<&Dataset> {
        self.dataset
            .get_or_try_init(|| loader::load(&self.config.movielens_data_dir))
    }

    pub fn content_model(&self) -> AppResult<&ContentModel> {
        let dataset = self.load()?;
        Ok(self
            .content
            .get_or_init(|| ContentModel::build(&dataset.catalog, self.config.content_engine())))
    }

    pub fn item_similarity(&self) -> AppResult<&ItemSimilarityMatrix> {
        let dataset = self.load()?;
        Ok(self
            .item_similarity
            .get_or_init(|| ItemSimilarityMatrix::build(&dataset.ratings)))
    }

    /// Mean rating per movie
    pub fn average_ratings(&self) -> AppResult<&HashMap<MovieId, f64>> {
        let dataset = self.load()?;
        Ok(self
            .average_ratings
            .get_or_init(|| dataset.ratings.average_ratings()))
    }

    pub fn summarize(&self) -> AppResult<Insights> {
        Ok(insights::summarize(self.load()?))
    }

    /// Every catalog title, sorted alphabetically
    pub fn titles(&self) -> AppResult<Vec<String>> {
        let mut titles: Vec<String> = self
            .load()?
            .catalog
            .iter()
            .map(|m| m.title.clone())
            .collect();
        titles.sort();
        Ok(titles)
    }

    /// Best catalog match for a free-text title
    pub fn resolve(&self, query: &str) -> AppResult<&Movie> {
        let dataset = self.load()?;
        resolve_title(query, &dataset.catalog).ok_or(AppError::EmptyCatalog)
    }

    pub fn recommend_by_content(
        &self,
        title: &str,
        k: usize,
        min_avg_rating: Option<f64>,
    ) -> AppResult<RecommendationSet> {
        self.recommend(Strategy::Content, title, k, min_avg_rating)
    }

    pub fn recommend_by_item_cf(
        &self,
        title: &str,
        k: usize,
        min_avg_rating: Option<f64>,
    ) -> AppResult<RecommendationSet> {
        self.recommend(Strategy::ItemCf, title, k, min_avg_rating)
    }

    /// Up to `k` movies similar to the one `title` resolves to
    ///
    /// A `min_avg_rating` of zero or less applies no filter. With a filter,
    /// movies without ratings or averaging below the threshold are skipped.
    pub fn recommend(
        &self,
        strategy: Strategy,
        title: &str,
        k: usize,
        min_avg_rating: Option<f64>,
    ) -> AppResult<RecommendationSet> {
        if k == 0 {
            return Err(AppError::InvalidInput(
                "k must be at least 1".to_string(),
            ));
        }

        let dataset = self.load()?;
        let target = self.resolve(title)?;
        let threshold = min_avg_rating.filter(|t| *t > 0.0);
        let averages = match threshold {
            Some(_) => Some(self.average_ratings()?),
            None => None,
        };

        let candidates: Vec<(&Movie, f64)> = match strategy {
            Strategy::Content => {
                let model = self.content_model()?;
                let position = dataset
                    .catalog
                    .iter()
                    .position(|m| std::ptr::eq(m, target))
                    .ok_or_else(|| AppError::Internal("resolved movie not in catalog".to_string()))?;
                let count = k
                    .saturating_mul(CONTENT_OVERSAMPLING)
                    .max(MIN_CONTENT_CANDIDATES);

                model
                    .similar(position, count)
                    .into_iter()
                    .filter_map(|(index, score)| dataset.catalog.get(index).map(|m| (m, score)))
                    .collect()
            }
            Strategy::ItemCf => self
                .item_similarity()?
                .neighbors(target.id)
                .into_iter()
                .filter_map(|(id, score)| dataset.catalog.by_id(id).map(|m| (m, score)))
                .collect(),
        };

        let recommendations: Vec<Recommendation> = candidates
            .into_iter()
            .filter(|(movie, _)| match (threshold, averages) {
                (Some(min), Some(averages)) => averages.get(&movie.id).is_some_and(|avg| *avg >= min),
                _ => true,
            })
            .take(k)
            .map(|(movie, score)| Recommendation {
                movie_id: movie.id,
                title: movie.title.clone(),
                genres: movie.genres_label(),
                score: round_score(score),
            })
            .collect();

        tracing::info!(
            strategy = %strategy,
            query = %title,
            matched = %target.title,
            results = recommendations.len(),
            "Recommendations computed"
        );

        Ok(RecommendationSet {
            matched_title: target.title.clone(),
            strategy,
            recommendations,
        })
    }
}

/// Rounds a score to 4 decimal places for presentation
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
