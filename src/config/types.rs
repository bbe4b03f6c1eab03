use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure for shopsift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Bare catalog URL; page n > 1 becomes `{base-url}/page/{n}`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Hard cap on pages processed per run, regardless of the request
    #[serde(rename = "max-page-limit", default = "default_max_page_limit")]
    pub max_page_limit: u32,

    /// Attempts per page before the page is skipped
    #[serde(rename = "retry-limit", default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Linear backoff unit in seconds (delay = attempt * unit)
    #[serde(rename = "retry-backoff-secs", default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,

    /// Optional proxy URL applied to all requests
    #[serde(default)]
    pub proxy: Option<String>,

    /// Static headers applied to all requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Cache behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(rename = "ttl-secs", default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON products file (the durable store)
    #[serde(rename = "products-path")]
    pub products_path: String,

    /// Directory where downloaded images are written
    #[serde(rename = "images-dir")]
    pub images_dir: String,
}

/// Job trigger server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to (host:port)
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Bearer token required by POST /scrape; overridable through the
    /// SHOPSIFT_AUTH_TOKEN environment variable
    #[serde(rename = "auth-token", default)]
    pub auth_token: String,
}

fn default_max_page_limit() -> u32 {
    10
}

fn default_retry_limit() -> u32 {
    5
}

fn default_retry_backoff_secs() -> u64 {
    2
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
