//! Catalog page fetcher
//!
//! Retrieves one page's raw HTML with retry and linear backoff. A page
//! that keeps failing is skipped, not fatal: one bad page must never
//! abort the whole job.

use crate::config::ScraperConfig;
use crate::ScrapeError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// User agent sent with every request
const USER_AGENT: &str = concat!("shopsift/", env!("CARGO_PKG_VERSION"));

/// Outcome of fetching one catalog page
#[derive(Debug)]
pub enum PageFetchOutcome {
    /// Raw HTML of the page
    Content(String),

    /// All attempts failed; the page contributes zero products
    Skipped {
        /// How many attempts were made before giving up
        attempts: u32,
    },
}

/// Builds an HTTP client with the scraper's static headers and proxy
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, ScrapeError> {
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => {
                tracing::warn!("Skipping unparseable header '{}'", name);
            }
        }
    }

    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}

/// Fetches catalog pages with retry/backoff
pub struct PageFetcher {
    client: Client,
    base_url: String,
    retry_limit: u32,
    backoff_unit: Duration,
}

impl PageFetcher {
    pub fn new(client: Client, config: &ScraperConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_limit: config.retry_limit.max(1),
            backoff_unit: Duration::from_secs(config.retry_backoff_secs),
        }
    }

    /// Page 1 uses the bare catalog URL; later pages get a `/page/{n}` suffix
    fn page_url(&self, page_number: u32) -> String {
        if page_number > 1 {
            format!("{}/page/{}", self.base_url, page_number)
        } else {
            self.base_url.clone()
        }
    }

    /// Fetches one page, retrying transient failures with linear backoff
    /// (delay = attempt number * backoff unit). Exhausting the retry
    /// limit degrades to [`PageFetchOutcome::Skipped`].
    pub async fn fetch_page(&self, page_number: u32) -> PageFetchOutcome {
        let url = self.page_url(page_number);

        for attempt in 1..=self.retry_limit {
            match self.fetch_once(&url).await {
                Ok(body) => return PageFetchOutcome::Content(body),
                Err(source) => {
                    let error = ScrapeError::Fetch {
                        page: page_number,
                        source,
                    };
                    let delay = self.backoff_unit * attempt;
                    tracing::error!(
                        "{} (attempt {}/{}). Retrying in {:?}.",
                        error,
                        attempt,
                        self.retry_limit,
                        delay
                    );

                    if attempt < self.retry_limit {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        tracing::warn!(
            "Page {} skipped after {} attempts.",
            page_number,
            self.retry_limit
        );
        PageFetchOutcome::Skipped {
            attempts: self.retry_limit,
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        response.text().await
    }
}
