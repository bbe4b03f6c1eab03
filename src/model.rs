//! Core data types shared across the pipeline
//!
//! The serde field renames on [`Product`] match the persisted JSON layout
//! (`product_id`, `product_title`, `product_price`, `path_to_image`), which
//! is also the shape stored in cache snapshots.

use serde::{Deserialize, Serialize};

/// One catalog item, as persisted in the durable store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable external identifier, unique key in the store
    pub product_id: String,

    /// Human-readable name
    #[serde(rename = "product_title")]
    pub title: String,

    /// Current observed price, non-negative
    #[serde(rename = "product_price")]
    pub price: f64,

    /// Filesystem location of the downloaded image; empty until downloaded
    #[serde(rename = "path_to_image")]
    pub image_path: String,
}

impl Product {
    /// A product is complete (eligible for persistence) once it carries a
    /// downloaded image path alongside its parsed price.
    pub fn is_complete(&self) -> bool {
        !self.image_path.is_empty()
    }
}

/// A parsed-but-not-yet-deduplicated product record extracted from a page
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateProduct {
    pub product_id: String,
    pub title: String,
    pub price: f64,
    pub image_url: String,
}

impl CandidateProduct {
    /// Builds a probe product for cache lookups, before any image exists.
    pub fn probe(&self) -> Product {
        Product {
            product_id: self.product_id.clone(),
            title: self.title.clone(),
            price: self.price,
            image_path: String::new(),
        }
    }

    /// Completes the candidate with its downloaded image path.
    pub fn into_product(self, image_path: String) -> Product {
        Product {
            product_id: self.product_id,
            title: self.title,
            price: self.price,
            image_path,
        }
    }
}

/// Request body accepted by the scrape job trigger
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub total_pages: u32,
}

/// Aggregate result of persisting a scrape batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub new: u64,
    pub updated: u64,
}
