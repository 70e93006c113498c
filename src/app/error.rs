use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum MatchdayError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Timed out after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    #[error("Fixture listing container not found on {url}")]
    ListingContainerMissing { url: String },

    #[error("No matches found on {url}")]
    NoMatches { url: String },

    #[error("Detail block not found on {url}")]
    DetailBlockMissing { url: String },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, MatchdayError>;
