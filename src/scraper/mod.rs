//! Scraper module: page fetching, field extraction, image downloads,
//! and the pipeline orchestrator that ties them together.

mod extractor;
mod fetcher;
mod images;
mod pipeline;

pub use extractor::extract_products;
pub use fetcher::{build_http_client, PageFetcher, PageFetchOutcome};
pub use images::ImageDownloader;
pub use pipeline::Pipeline;

use crate::cache::ProductCache;
use crate::config::Config;
use crate::model::StoreCounts;
use crate::notify::Notifier;
use crate::storage::ProductStorage;
use crate::ScrapeError;
use std::sync::Arc;

/// Runs a complete scrape of up to `total_pages` pages
///
/// Convenience entry point wrapping [`Pipeline::new`] + [`Pipeline::run`].
pub async fn scrape_all(
    config: &Config,
    cache: Arc<dyn ProductCache>,
    storage: Arc<dyn ProductStorage>,
    notifier: Arc<dyn Notifier>,
    total_pages: u32,
) -> Result<StoreCounts, ScrapeError> {
    let pipeline = Pipeline::new(config, cache, storage, notifier)?;
    pipeline.run(total_pages).await
}
