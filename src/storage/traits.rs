//! Storage trait and error types
//!
//! The durable store holds the authoritative set of all known products,
//! keyed by product id. Alternative backends (database, object store) can
//! plug in behind [`ProductStorage`].

use crate::model::{Product, StoreCounts};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for durable product storage backends
pub trait ProductStorage: Send + Sync {
    /// Returns all stored products; order is not significant.
    ///
    /// An absent, empty, or corrupt backing store yields an empty list
    /// rather than an error, so a damaged file never aborts a run.
    fn load_products(&self) -> StorageResult<Vec<Product>>;

    /// Merges a batch into the store and rewrites the whole snapshot.
    ///
    /// For each incoming product: an absent id counts as new, a present id
    /// counts as updated; either way the incoming product overwrites the
    /// stored record (last-write-wins, no field-level merge).
    fn store_products(&self, products: &[Product]) -> StorageResult<StoreCounts>;
}
