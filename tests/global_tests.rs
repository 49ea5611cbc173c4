use std::path::PathBuf;

/// The process-wide recommender is configured from the environment once, so
/// everything touching it lives in this single test.
#[test]
fn test_process_wide_operations() {
    let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
    std::env::set_var("MOVIELENS_DATA_DIR", &data_dir);
    std::env::set_var("CONTENT_ENGINE", "jaccard");

    let first = movie_recommender::load().unwrap();
    let second = movie_recommender::load().unwrap();
    assert!(std::ptr::eq(first, second));

    let insights = movie_recommender::summarize().unwrap();
    assert_eq!(insights.total_movies, first.catalog.len());
    assert_eq!(insights.total_ratings, first.ratings.len());

    let content = movie_recommender::recommend_by_content("Toy Story", 5, None).unwrap();
    assert_eq!(content.matched_title, "Toy Story (1995)");
    assert_eq!(content.recommendations.len(), 5);

    let item_cf = movie_recommender::recommend_by_item_cf("Toy Story", 5, Some(0.0)).unwrap();
    assert_eq!(item_cf.matched_title, "Toy Story (1995)");
    assert!(item_cf.recommendations.len() <= 5);

    let recommender = movie_recommender::Recommender::global();
    assert_eq!(recommender.config().movielens_data_dir, data_dir);
    assert!(std::ptr::eq(recommender, movie_recommender::Recommender::global()));
}
