//! Pipeline orchestrator
//!
//! Drives fetch → extract → cache-check → download → collect across all
//! requested pages, then reconciles with the durable store in one batch
//! and reports the resulting counts.
//!
//! Granularity policy: the cache is written through per product as soon
//! as it clears download; the durable store is written exactly once per
//! run with the full accumulated batch. Both entry points (CLI and API)
//! share this policy.

use crate::cache::ProductCache;
use crate::config::Config;
use crate::model::{Product, StoreCounts};
use crate::notify::Notifier;
use crate::scraper::extractor::extract_products;
use crate::scraper::fetcher::{build_http_client, PageFetcher, PageFetchOutcome};
use crate::scraper::images::ImageDownloader;
use crate::storage::ProductStorage;
use crate::ScrapeError;
use std::sync::Arc;

/// Orchestrates one scrape run end to end
pub struct Pipeline {
    fetcher: PageFetcher,
    downloader: ImageDownloader,
    cache: Arc<dyn ProductCache>,
    storage: Arc<dyn ProductStorage>,
    notifier: Arc<dyn Notifier>,
    max_page_limit: u32,
}

impl Pipeline {
    /// Builds a pipeline sharing one HTTP client between the page fetcher
    /// and the image downloader.
    pub fn new(
        config: &Config,
        cache: Arc<dyn ProductCache>,
        storage: Arc<dyn ProductStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ScrapeError> {
        let client = build_http_client(&config.scraper)?;
        let fetcher = PageFetcher::new(client.clone(), &config.scraper);
        let downloader = ImageDownloader::new(client, &config.output.images_dir);

        Ok(Self {
            fetcher,
            downloader,
            cache,
            storage,
            notifier,
            max_page_limit: config.scraper.max_page_limit,
        })
    }

    /// Runs a full scrape of `requested_pages` pages (capped by the
    /// configured page limit) and returns the persisted counts.
    ///
    /// Page fetch failures and per-candidate failures are absorbed and
    /// logged; only a store-write failure aborts the run.
    pub async fn run(&self, requested_pages: u32) -> Result<StoreCounts, ScrapeError> {
        let page_count = self.max_page_limit.min(requested_pages);
        tracing::info!("Starting scrape of up to {} pages", page_count);

        let mut accepted: Vec<Product> = Vec::new();

        for page in 1..=page_count {
            let page_products = self.process_page(page).await;
            tracing::info!("Page {}: {} products accepted", page, page_products.len());
            accepted.extend(page_products);
        }

        tracing::info!(
            "Scrape complete. Total products accepted: {}",
            accepted.len()
        );

        let counts = self.storage.store_products(&accepted)?;
        self.notifier.notify(counts.new, counts.updated);

        Ok(counts)
    }

    /// Processes one page: fetch, extract, dedupe, download, cache-write.
    async fn process_page(&self, page: u32) -> Vec<Product> {
        tracing::info!("Scraping page {}...", page);

        let body = match self.fetcher.fetch_page(page).await {
            PageFetchOutcome::Content(body) => body,
            PageFetchOutcome::Skipped { attempts } => {
                tracing::warn!("Skipping page {} after {} failed attempts", page, attempts);
                return Vec::new();
            }
        };

        let candidates = extract_products(&body, self.cache.as_ref());
        let mut products = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self
                .downloader
                .download(&candidate.image_url, &candidate.title)
                .await
            {
                Ok(path) => {
                    let product = candidate.into_product(path.to_string_lossy().into_owned());
                    self.cache.store(&product);
                    tracing::info!("Scraped product: {} at {}", product.title, product.price);
                    products.push(product);
                }
                Err(e) => {
                    tracing::warn!(
                        "Dropping candidate {} ({}): {}",
                        candidate.title,
                        candidate.product_id,
                        e
                    );
                }
            }
        }

        products
    }
}
