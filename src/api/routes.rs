use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/insights", get(handlers::get_insights))
        // Titles
        .route("/titles", get(handlers::get_titles))
        .route("/titles/resolve", get(handlers::resolve_title))
        // Recommendations
        .route("/recommendations/content", get(handlers::recommend_content))
        .route("/recommendations/item-cf", get(handlers::recommend_item_cf))
}
