use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::DataSources;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the three corpus CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Movie attributes file (id, title, genres)
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Cast and crew file (id, cast, crew)
    #[serde(default = "default_credits_file")]
    pub credits_file: String,

    /// Keyword tags file (id, keywords)
    #[serde(default = "default_keywords_file")]
    pub keywords_file: String,

    /// TMDb API key; poster lookups answer "unavailable" without it
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix prepended to TMDb poster paths
    #[serde(default = "default_tmdb_image_base")]
    pub tmdb_image_base: String,

    /// Upper bound for a single poster lookup
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Redis connection URL; poster caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

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

fn default_metadata_file() -> String {
    "clean_metadata.csv".to_string()
}

fn default_credits_file() -> String {
    "trimmed_credits.csv".to_string()
}

fn default_keywords_file() -> String {
    "clean_keywords.csv".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_poster_timeout_secs() -> u64 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Paths of the three corpus files
    pub fn data_sources(&self) -> DataSources {
        DataSources {
            metadata: self.data_dir.join(&self.metadata_file),
            credits: self.data_dir.join(&self.credits_file),
            keywords: self.data_dir.join(&self.keywords_file),
        }
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_secs(self.poster_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
