use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;
use tempfile::TempDir;

use movie_recommender::{
    api::{create_router, AppState},
    config::Config,
    services::{ContentEngineKind, Recommender},
};

const MOVIES: &str = "movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Jumanji (1995),Adventure|Children|Fantasy
3,Shrek (2001),Adventure|Animation|Children|Comedy|Fantasy|Romance
4,Heat (1995),Action|Crime|Thriller
5,Toy Story 2 (1999),Adventure|Animation|Children|Comedy|Fantasy
";

const RATINGS: &str = "userId,movieId,rating,timestamp
1,1,5.0,964982703
1,5,5.0,964982704
1,4,1.0,964982705
1,2,3.0,964982706
2,1,2.0,964982707
2,5,2.0,964982708
2,4,5.0,964982709
2,2,3.5,964982710
3,3,4.0,964982711
";

fn write_file(dir: &Path, name: &str, contents: &str) {
    let mut file = std::fs::File::create(dir.join(name)).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
}

fn create_test_server(dir: &TempDir) -> TestServer {
    let config = Config::with_data_dir(dir.path()).with_content_engine(ContentEngineKind::Jaccard);
    let state = AppState::new(Arc::new(Recommender::new(config)));
    TestServer::new(create_router(state)).unwrap()
}

fn dataset_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "movies.csv", MOVIES);
    write_file(dir.path(), "ratings.csv", RATINGS);
    dir
}

#[tokio::test]
async fn test_health_check() {
    let dir = dataset_dir();
    let server = create_test_server(&dir);

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_insights() {
    let dir = dataset_dir();
    let server = create_test_server(&dir);

    let response = server.get("/api/v1/insights").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["total_movies"], 5);
    assert_eq!(body["total_ratings"], 9);

    let top = body["top5_popular"].as_array().unwrap();
    assert_eq!(top.len(), 5);
    assert_eq!(top[0]["movie_id"], 1);
    assert_eq!(top[0]["num_ratings"], 2);
    assert_eq!(top[4]["title"], "Shrek (2001)");
}

#[tokio::test]
async fn test_titles_sorted() {
    let dir = dataset_dir();
    let server = create_test_server(&dir);

    let response = server.get("/api/v1/titles").await;
    response.assert_status_ok();

    let titles: Vec<String> = response.json();
    assert_eq!(titles.len(), 5);
    assert_eq!(titles[0], "Heat (1995)");
}

#[tokio::test]
async fn test_resolve_title() {
    let dir = dataset_dir();
    let server = create_test_server(&dir);

    let response = server
        .get("/api/v1/titles/resolve")
        .add_query_param("q", "toy story")
        .await;
    response.assert_status_ok();

    let movie: Value = response.json();
    assert_eq!(movie["id"], 1);
    assert_eq!(movie["title"], "Toy Story (1995)");
}

#[tokio::test]
async fn test_content_recommendations() {
    let dir = dataset_dir();
    let server = create_test_server(&dir);

    let response = server
        .get("/api/v1/recommendations/content")
        .add_query_param("title", "Toy Story")
        .add_query_param("k", 2)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["matched_title"], "Toy Story (1995)");
    assert_eq!(body["strategy"], "content");

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["movie_id"], 5);
    assert_eq!(recs[0]["score"], 1.0);
    assert_eq!(recs[1]["movie_id"], 3);
    assert_eq!(recs[1]["score"], 0.8333);
}

#[tokio::test]
async fn test_item_cf_recommendations_with_filter() {
    let dir = dataset_dir();
    let server = create_test_server(&dir);

    let response = server
        .get("/api/v1/recommendations/item-cf")
        .add_query_param("title", "Toy Story (1995)")
        .add_query_param("min_avg_rating", 3.5)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["strategy"], "item_cf");

    // only Toy Story 2 correlates and averages at least 3.5
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["movie_id"], 5);
}

#[tokio::test]
async fn test_k_zero_is_bad_request() {
    let dir = dataset_dir();
    let server = create_test_server(&dir);

    let response = server
        .get("/api/v1/recommendations/content")
        .add_query_param("title", "Heat")
        .add_query_param("k", 0)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("k must be at least 1"));
}

#[tokio::test]
async fn test_missing_data_is_server_error() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir);

    let response = server.get("/api/v1/insights").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("movies.csv"));
}
