//! In-memory TTL cache implementation
//!
//! Entries expire lazily: an expired entry is treated as absent on lookup
//! and evicted on the next overwrite. The stored value carries both the
//! price (for the dedup rule) and a serialized JSON snapshot of the
//! product, matching the cache wire format.

use crate::cache::{cache_key, ProductCache};
use crate::model::Product;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// A single cached product observation
#[derive(Debug, Clone)]
struct CacheEntry {
    price: f64,
    snapshot: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// In-memory product cache with a fixed time-to-live per entry
pub struct InMemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    /// Creates a cache whose entries live for `ttl_secs` seconds
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_secs as i64),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.values().filter(|e| !e.is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached JSON snapshot for a product id, if unexpired
    pub fn snapshot(&self, product_id: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&cache_key(product_id))
            .filter(|e| !e.is_expired())
            .map(|e| e.snapshot.clone())
    }
}

impl ProductCache for InMemoryCache {
    fn is_cached(&self, product: &Product) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        match entries.get(&cache_key(&product.product_id)) {
            Some(entry) if !entry.is_expired() => entry.price == product.price,
            _ => false,
        }
    }

    fn store(&self, product: &Product) {
        let snapshot = match serde_json::to_string(product) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(
                    "Failed to serialize product {} for caching: {}",
                    product.product_id,
                    e
                );
                return;
            }
        };

        let entry = CacheEntry {
            price: product.price,
            snapshot,
            expires_at: Utc::now() + self.ttl,
        };

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(cache_key(&product.product_id), entry);
    }
}
