//! Configuration loading, parsing, and validation
//!
//! Configuration lives in a TOML file; the server auth token may be
//! overridden by the `SHOPSIFT_AUTH_TOKEN` environment variable so the
//! credential never has to be written to disk.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash, AUTH_TOKEN_ENV};
pub use types::{CacheConfig, Config, OutputConfig, ScraperConfig, ServerConfig};
pub use validation::validate;
