//! Shared fixtures for the integration tests

use shopsift::cache::InMemoryCache;
use shopsift::config::{CacheConfig, Config, OutputConfig, ScraperConfig, ServerConfig};
use shopsift::notify::Notifier;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Builds a config pointing at a mock catalog, with scratch output paths
/// and zero backoff so retry tests run fast.
pub fn test_config(base_url: &str, out_dir: &Path) -> Config {
    Config {
        scraper: ScraperConfig {
            base_url: base_url.to_string(),
            max_page_limit: 10,
            retry_limit: 2,
            retry_backoff_secs: 0,
            proxy: None,
            headers: HashMap::new(),
        },
        cache: CacheConfig { ttl_secs: 3600 },
        output: OutputConfig {
            products_path: out_dir
                .join("products.json")
                .to_string_lossy()
                .into_owned(),
            images_dir: out_dir.join("assets").to_string_lossy().into_owned(),
        },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
            auth_token: "test-secret".to_string(),
        },
    }
}

pub fn fresh_cache() -> InMemoryCache {
    InMemoryCache::new(3600)
}

/// One WooCommerce-style product card
pub fn product_card(id: &str, title: &str, price: &str, image_url: &str) -> String {
    format!(
        r##"<div class="product-inner">
            <h2 class="woo-loop-product__title">{title}</h2>
            <span class="price"><span class="amount">₹{price}</span></span>
            <img src="placeholder.gif" data-lazy-src="{image_url}" />
            <div class="addtocart-buynow-btn"><a data-product_id="{id}" href="#">Add to cart</a></div>
        </div>"##
    )
}

/// A card without a lazy-load image attribute (must be skipped)
pub fn imageless_card(id: &str, title: &str, price: &str) -> String {
    format!(
        r##"<div class="product-inner">
            <h2 class="woo-loop-product__title">{title}</h2>
            <span class="price"><span class="amount">₹{price}</span></span>
            <img src="placeholder.gif" />
            <div class="addtocart-buynow-btn"><a data-product_id="{id}" href="#">Add to cart</a></div>
        </div>"##
    )
}

pub fn catalog_page(cards: &[String]) -> String {
    format!(
        "<html><head><title>Shop</title></head><body>{}</body></html>",
        cards.join("\n")
    )
}

/// Notifier test double recording every call
pub struct RecordingNotifier {
    pub calls: Mutex<Vec<(u64, u64)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, new_count: u64, updated_count: u64) {
        self.calls.lock().unwrap().push((new_count, updated_count));
    }
}
