use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    services::Recommender,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Arc<Recommender>) -> Self {
        Self { recommender }
    }

    /// Runs model work on the blocking pool
    ///
    /// Loading and model builds are CPU-bound and may take seconds on the
    /// full dataset, so they stay off the async workers.
    pub async fn run_blocking<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Recommender) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let recommender = self.recommender.clone();
        tokio::task::spawn_blocking(move || f(&recommender))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
