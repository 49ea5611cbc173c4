use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{Insights, Movie, RecommendationSet, Strategy},
};

use super::AppState;

// Request types

fn default_k() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    #[serde(default = "default_k")]
    pub k: usize,
    pub min_avg_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub q: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Dataset totals and most-rated movies
pub async fn get_insights(State(state): State<AppState>) -> AppResult<Json<Insights>> {
    let insights = state.run_blocking(|r| r.summarize()).await?;
    Ok(Json(insights))
}

/// All catalog titles, sorted
pub async fn get_titles(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let titles = state.run_blocking(|r| r.titles()).await?;
    Ok(Json(titles))
}

/// Catalog entry a free-text query resolves to
pub async fn resolve_title(
    State(state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .run_blocking(move |r| r.resolve(&params.q).cloned())
        .await?;
    Ok(Json(movie))
}

/// Genre-similarity recommendations
pub async fn recommend_content(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationSet>> {
    recommend(state, request_id, Strategy::Content, params).await
}

/// Rating-correlation recommendations
pub async fn recommend_item_cf(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationSet>> {
    recommend(state, request_id, Strategy::ItemCf, params).await
}

async fn recommend(
    state: AppState,
    request_id: RequestId,
    strategy: Strategy,
    params: RecommendationQuery,
) -> AppResult<Json<RecommendationSet>> {
    tracing::info!(
        request_id = %request_id,
        strategy = %strategy,
        title = %params.title,
        k = params.k,
        min_avg_rating = ?params.min_avg_rating,
        "Processing recommendation request"
    );

    let result = state
        .run_blocking(move |r| {
            r.recommend(strategy, &params.title, params.k, params.min_avg_rating)
        })
        .await?;

    tracing::info!(
        request_id = %request_id,
        matched = %result.matched_title,
        results = result.recommendations.len(),
        "Recommendation request completed"
    );

    Ok(Json(result))
}
