//! Product image downloader
//!
//! Fetches an image and writes the raw bytes verbatim to a
//! collision-resistant filename derived from the product title. Unlike
//! page fetches, a failed image download is not retried: it fails only
//! the candidate that needed it.

use crate::ScrapeError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use std::path::{Path, PathBuf};

const SUFFIX_LEN: usize = 6;
const IMAGE_EXTENSION: &str = "jpg";

/// Downloads product images into a fixed directory
pub struct ImageDownloader {
    client: Client,
    images_dir: PathBuf,
}

impl ImageDownloader {
    pub fn new(client: Client, images_dir: impl AsRef<Path>) -> Self {
        Self {
            client,
            images_dir: images_dir.as_ref().to_path_buf(),
        }
    }

    /// Fetches `image_url` and stores it under the images directory.
    ///
    /// The directory is created if missing. Network failures surface as
    /// [`ScrapeError::Download`] and are left to the caller to absorb.
    pub async fn download(&self, image_url: &str, title: &str) -> Result<PathBuf, ScrapeError> {
        tracing::info!("Downloading image for: {}", title);

        tokio::fs::create_dir_all(&self.images_dir).await?;

        let bytes = self
            .fetch_bytes(image_url)
            .await
            .map_err(|source| ScrapeError::Download {
                url: image_url.to_string(),
                source,
            })?;

        let filepath = self.images_dir.join(build_filename(title));
        tokio::fs::write(&filepath, &bytes).await?;

        Ok(filepath)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Alphanumeric characters of the title plus a random 6-character suffix
fn build_filename(title: &str) -> String {
    let sanitized: String = title.chars().filter(|c| c.is_alphanumeric()).collect();
    let suffix = random_alphanumeric(SUFFIX_LEN);
    format!("{}_{}.{}", sanitized, suffix, IMAGE_EXTENSION)
}

fn random_alphanumeric(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
