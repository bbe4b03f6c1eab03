//! Integration tests for the scrape-dedupe-persist pipeline
//!
//! These tests use wiremock to stand in for the catalog site and its
//! image CDN, and tempfile for scratch storage.

mod helpers;
mod scrape_tests;
