use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Catalog, Movie, MovieId, Rating, RatingLog, UserId},
};

pub const MOVIES_FILE: &str = "movies.csv";
pub const RATINGS_FILE: &str = "ratings.csv";
pub const MOVIES_FALLBACK_FILE: &str = "movies_fallback.csv";
pub const RATINGS_FALLBACK_FILE: &str = "ratings_fallback.csv";

pub const MOVIE_COLUMNS: [&str; 3] = ["movieId", "title", "genres"];
pub const RATING_COLUMNS: [&str; 3] = ["userId", "movieId", "rating"];

/// Catalog and rating log loaded together
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub catalog: Catalog,
    pub ratings: RatingLog,
}

/// Primary and fallback locations of both input files
#[derive(Debug, Clone, PartialEq)]
pub struct DataFiles {
    pub movies: PathBuf,
    pub movies_fallback: PathBuf,
    pub ratings: PathBuf,
    pub ratings_fallback: PathBuf,
}

impl DataFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            movies: dir.join(MOVIES_FILE),
            movies_fallback: dir.join(MOVIES_FALLBACK_FILE),
            ratings: dir.join(RATINGS_FILE),
            ratings_fallback: dir.join(RATINGS_FALLBACK_FILE),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieRecord {
    movie_id: MovieId,
    title: String,
    #[serde(default)]
    genres: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingRecord {
    user_id: UserId,
    movie_id: MovieId,
    rating: f64,
}

/// Loads the catalog and rating log from a data directory
///
/// Each file is read from its primary path when present, otherwise from the
/// bundled fallback. Both files must carry their required columns.
pub fn load(data_dir: &Path) -> AppResult<Dataset> {
    let start = Instant::now();
    let files = DataFiles::in_dir(data_dir);

    let movies_path = pick_path(&files.movies, &files.movies_fallback)?;
    let ratings_path = pick_path(&files.ratings, &files.ratings_fallback)?;

    let catalog = read_catalog(movies_path)?;
    let ratings = read_ratings(ratings_path)?;

    tracing::info!(
        movies = catalog.len(),
        ratings = ratings.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Dataset loaded"
    );

    Ok(Dataset { catalog, ratings })
}

/// Chooses the primary path if it exists, else the fallback
pub fn pick_path<'a>(primary: &'a Path, fallback: &'a Path) -> AppResult<&'a Path> {
    if primary.exists() {
        tracing::info!(path = %primary.display(), "Using primary data file");
        Ok(primary)
    } else if fallback.exists() {
        tracing::warn!(
            primary = %primary.display(),
            fallback = %fallback.display(),
            "Primary data file not found, using fallback sample"
        );
        Ok(fallback)
    } else {
        Err(AppError::MissingData {
            primary: primary.to_path_buf(),
            fallback: fallback.to_path_buf(),
        })
    }
}

/// Reads a movie catalog CSV with `movieId,title,genres` columns
pub fn read_catalog(path: &Path) -> AppResult<Catalog> {
    let mut reader = open_with_columns(path, &MOVIE_COLUMNS)?;

    let mut movies = Vec::new();
    for record in reader.deserialize() {
        let record: MovieRecord = record?;
        let genres = record.genres.unwrap_or_default();
        movies.push(Movie::new(record.movie_id, record.title, &genres));
    }

    Ok(Catalog::new(movies))
}

/// Reads a rating log CSV with `userId,movieId,rating` columns
pub fn read_ratings(path: &Path) -> AppResult<RatingLog> {
    let mut reader = open_with_columns(path, &RATING_COLUMNS)?;

    let mut ratings = Vec::new();
    for record in reader.deserialize() {
        let record: RatingRecord = record?;
        ratings.push(Rating::new(record.user_id, record.movie_id, record.rating));
    }

    Ok(RatingLog::new(ratings))
}

/// Opens a CSV file and checks its header row for the required columns
fn open_with_columns(path: &Path, required: &[&str]) -> AppResult<csv::Reader<File>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?;
    let missing: Vec<String> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .map(|column| column.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Schema {
            file: path.display().to_string(),
            missing,
        });
    }

    Ok(reader)
}
