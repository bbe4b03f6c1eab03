//! Shopsift: a catalog scrape-dedupe-persist pipeline
//!
//! This crate scrapes product listings from a paginated e-commerce catalog,
//! extracts structured product records, downloads product images, and
//! deduplicates against a TTL cache and a durable JSON-file store before
//! reporting aggregate (new, updated) counts.

pub mod cache;
pub mod config;
pub mod model;
pub mod notify;
pub mod scraper;
pub mod server;
pub mod storage;

use thiserror::Error;

/// Main error type for shopsift operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for page {page}: {source}")]
    Fetch { page: u32, source: reqwest::Error },

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Image download error for {url}: {source}")]
    Download { url: String, source: reqwest::Error },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for shopsift operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::ProductCache;
pub use config::Config;
pub use model::{CandidateProduct, Product, ScrapeRequest, StoreCounts};
pub use notify::Notifier;
pub use storage::ProductStorage;
