//! Ephemeral product cache
//!
//! The cache answers "have I seen this product at this price recently?"
//! Entries are keyed by product id alone; the observed price is part of the
//! value, so a price change makes a product look uncached and forces
//! re-processing.

mod memory;

pub use memory::InMemoryCache;

use crate::model::Product;

/// Prefix for cache keys, matching the wire format `product_cache::<id>`
pub const CACHE_KEY_PREFIX: &str = "product_cache::";

/// Builds the cache key for a product id
pub fn cache_key(product_id: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, product_id)
}

/// Trait for product cache implementations
///
/// Implementations must be shareable across tasks; the pipeline consults
/// the cache per candidate and writes through per accepted product.
pub trait ProductCache: Send + Sync {
    /// Returns true iff an unexpired entry exists for the product's id
    /// AND the stored price equals the product's current price.
    fn is_cached(&self, product: &Product) -> bool;

    /// Writes or overwrites the entry for the product with a fresh expiry.
    fn store(&self, product: &Product);
}
