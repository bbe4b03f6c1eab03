//! Result reporting
//!
//! The pipeline only needs a fire-and-forget `notify(new, updated)` sink;
//! alternative delivery channels (email, SMS, webhooks) can plug in
//! behind the trait.

/// Trait for scrape result sinks
pub trait Notifier: Send + Sync {
    /// Reports the outcome of one scrape run. Fire-and-forget: the
    /// pipeline never consumes a return value.
    fn notify(&self, new_count: u64, updated_count: u64);
}

/// Notifier that reports through the structured log
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, new_count: u64, updated_count: u64) {
        tracing::info!(
            "Scrape results: {} new products saved and {} products updated.",
            new_count,
            updated_count
        );
    }
}
