//! HTML field extraction
//!
//! Parses one catalog page into candidate products. A malformed card is
//! skipped with a log line, never an error: extraction failures are
//! absorbed at the smallest scope.
//!
//! Per-card rules:
//! - title is required (card dropped without it);
//! - the product id comes from the add-to-cart control's
//!   `data-product_id` attribute and is required;
//! - a discounted `<ins>` price wins over the regular `span.amount`;
//!   a card with neither price element is skipped;
//! - the image URL comes from the lazy-load `data-lazy-src` attribute;
//!   a card without one is skipped before any download is attempted.

use crate::cache::ProductCache;
use crate::model::CandidateProduct;
use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};

/// Extracts candidate products from a page, consulting the cache per
/// candidate so already-seen products are dropped before image I/O.
pub fn extract_products(html: &str, cache: &dyn ProductCache) -> Vec<CandidateProduct> {
    let document = Html::parse_document(html);

    let card_selector = match Selector::parse("div.product-inner") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut candidates = Vec::new();

    for card in document.select(&card_selector) {
        let candidate = match extract_card(&card) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::warn!("{}, skipping entry", e);
                continue;
            }
        };

        if cache.is_cached(&candidate.probe()) {
            tracing::debug!(
                "Product {} already cached at price {}, skipping",
                candidate.product_id,
                candidate.price
            );
            continue;
        }

        candidates.push(candidate);
    }

    candidates
}

/// Extracts a single product card
fn extract_card(card: &ElementRef) -> Result<CandidateProduct, ScrapeError> {
    let title = select_text(card, "h2.woo-loop-product__title")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ScrapeError::Extraction("product card missing title".to_string()))?;

    let product_id = select_attr(card, "div.addtocart-buynow-btn a", "data-product_id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ScrapeError::Extraction(format!("product id missing for product: {}", title))
        })?;

    let price = extract_price(card).ok_or_else(|| {
        ScrapeError::Extraction(format!("price missing for product: {}", title))
    })?;

    let image_url = select_attr(card, "img", "data-lazy-src")
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            ScrapeError::Extraction(format!("image missing for product: {}", title))
        })?;

    Ok(CandidateProduct {
        product_id,
        title,
        price,
        image_url,
    })
}

/// Parses the card's price, preferring the discounted `<ins>` element
fn extract_price(card: &ElementRef) -> Option<f64> {
    let price_selector = Selector::parse("span.price").ok()?;
    let price_tag = card.select(&price_selector).next()?;

    let ins_selector = Selector::parse("ins").ok()?;
    if let Some(discounted) = price_tag.select(&ins_selector).next() {
        return parse_price(&discounted.text().collect::<String>());
    }

    let amount_selector = Selector::parse("span.amount").ok()?;
    let amount = price_tag.select(&amount_selector).next()?;
    parse_price(&amount.text().collect::<String>())
}

/// Strips currency symbols and separators, then parses to f64
fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned.parse::<f64>().ok().filter(|p| *p >= 0.0)
}

fn select_text(card: &ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    card.select(&selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
}

fn select_attr(card: &ElementRef, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    card.select(&selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
}
