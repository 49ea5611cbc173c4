use std::sync::Arc;

use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::Recommender,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr();
    let state = AppState::new(Arc::new(Recommender::new(config)));

    // Load the dataset up front so missing or malformed files fail at startup
    let insights = state.run_blocking(|r| r.summarize()).await?;
    tracing::info!(
        movies = insights.total_movies,
        ratings = insights.total_ratings,
        "Dataset ready"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
