use std::path::PathBuf;

use serde::Deserialize;

use crate::services::content::ContentEngineKind;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding movies.csv / ratings.csv and their fallbacks
    #[serde(default = "default_data_dir")]
    pub movielens_data_dir: PathBuf,

    /// Forces a content similarity engine; unset picks the compiled-in default
    #[serde(default)]
    pub content_engine: Option<ContentEngineKind>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            movielens_data_dir: default_data_dir(),
            content_engine: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Config for a given data directory, everything else defaulted
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            movielens_data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_content_engine(mut self, engine: ContentEngineKind) -> Self {
        self.content_engine = Some(engine);
        self
    }

    /// Engine used for content similarity
    pub fn content_engine(&self) -> ContentEngineKind {
        self.content_engine.unwrap_or_default()
    }

    /// Address the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
