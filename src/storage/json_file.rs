//! JSON-file storage backend
//!
//! The backing file is a single JSON array of product objects. Every store
//! is a whole-snapshot rewrite through a temp file and rename; the
//! merge/count semantics are unaffected by the rename hardening.

use crate::model::{Product, StoreCounts};
use crate::storage::{ProductStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Durable product store backed by a JSON array file
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage handle, ensuring the parent directory exists
    pub fn new(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductStorage for JsonFileStorage {
    fn load_products(&self) -> StorageResult<Vec<Product>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Storage file not found, starting with an empty set");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&content) {
            Ok(products) => Ok(products),
            Err(e) => {
                tracing::warn!(
                    "Invalid JSON in storage file {}: {}. Treating as empty set.",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    fn store_products(&self, products: &[Product]) -> StorageResult<StoreCounts> {
        let mut record_set: HashMap<String, Product> = self
            .load_products()?
            .into_iter()
            .map(|p| (p.product_id.clone(), p))
            .collect();

        let mut counts = StoreCounts::default();

        for product in products {
            if record_set.contains_key(&product.product_id) {
                counts.updated += 1;
            } else {
                counts.new += 1;
            }
            record_set.insert(product.product_id.clone(), product.clone());
        }

        let snapshot: Vec<&Product> = record_set.values().collect();
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Whole-snapshot rewrite; the rename keeps a crash from leaving a
        // half-written file behind.
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::info!(
            "Products saved: {} new, {} updated.",
            counts.new,
            counts.updated
        );

        Ok(counts)
    }
}
