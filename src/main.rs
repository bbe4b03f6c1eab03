//! Shopsift main entry point
//!
//! Command-line interface for the shopsift catalog scraper. Runs either a
//! one-shot scrape (`--pages N`) or the HTTP job trigger (`--serve`).

use clap::Parser;
use shopsift::cache::InMemoryCache;
use shopsift::config::load_config_with_hash;
use shopsift::notify::LogNotifier;
use shopsift::server::{serve, AppState};
use shopsift::storage::JsonFileStorage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shopsift: a catalog scrape-dedupe-persist pipeline
#[derive(Parser, Debug)]
#[command(name = "shopsift")]
#[command(version)]
#[command(about = "Scrape a product catalog, dedupe, and persist results", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a one-shot scrape of up to N pages
    #[arg(long, value_name = "N", conflicts_with = "serve")]
    pages: Option<u32>,

    /// Start the HTTP job trigger and wait for scrape requests
    #[arg(long)]
    serve: bool,

    /// Validate the config and show what would be scraped, without scraping
    #[arg(long, conflicts_with_all = ["pages", "serve"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
    } else if cli.serve {
        handle_serve(config).await?;
    } else if let Some(pages) = cli.pages {
        handle_scrape(config, pages).await?;
    } else {
        return Err("Specify --pages <N> for a one-shot scrape, --serve, or --dry-run".into());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shopsift=info,warn"),
            1 => EnvFilter::new("shopsift=debug,info"),
            2 => EnvFilter::new("shopsift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds the shared collaborators every mode needs
fn build_state(config: shopsift::Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let storage = JsonFileStorage::new(&config.output.products_path)?;

    Ok(AppState {
        cache: Arc::new(InMemoryCache::new(config.cache.ttl_secs)),
        storage: Arc::new(storage),
        notifier: Arc::new(LogNotifier),
        config: Arc::new(config),
    })
}

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &shopsift::Config, config_hash: &str) {
    println!("=== Shopsift Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Base URL: {}", config.scraper.base_url);
    println!("  Max page limit: {}", config.scraper.max_page_limit);
    println!("  Retry limit: {}", config.scraper.retry_limit);
    println!(
        "  Retry backoff unit: {}s",
        config.scraper.retry_backoff_secs
    );
    match &config.scraper.proxy {
        Some(proxy) => println!("  Proxy: {}", proxy),
        None => println!("  Proxy: none"),
    }

    println!("\nCache:");
    println!("  TTL: {}s", config.cache.ttl_secs);

    println!("\nOutput:");
    println!("  Products file: {}", config.output.products_path);
    println!("  Images directory: {}", config.output.images_dir);

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind);

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the one-shot scrape mode
async fn handle_scrape(
    config: shopsift::Config,
    pages: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config)?;

    let counts = shopsift::scraper::scrape_all(
        &state.config,
        state.cache.clone(),
        state.storage.clone(),
        state.notifier.clone(),
        pages,
    )
    .await?;

    println!("Scrape finished: {} new, {} updated", counts.new, counts.updated);
    Ok(())
}

/// Handles the --serve mode: runs the HTTP job trigger
async fn handle_serve(config: shopsift::Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config)?;
    serve(state).await?;
    Ok(())
}
