//! Progress-callback trait for per-row generation events.
//!
//! Inject an [`Arc<dyn CatalogueProgressCallback>`] via
//! [`crate::config::CatalogueConfigBuilder::progress_callback`] to hear about
//! each product row as the card stage works through the spreadsheet. The CLI
//! uses it to drive a progress bar; library callers can forward the events
//! wherever they like.
//!
//! # Example
//!
//! ```rust
//! use giordano_catalogue::{CatalogueConfig, CatalogueProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl CatalogueProgressCallback for CountingCallback {
//!     fn on_card_rendered(&self, _index: usize, _total: usize, model: &str) {
//!         self.rendered.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("card ready: {model}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { rendered: AtomicUsize::new(0) });
//!
//! let config = CatalogueConfig::builder()
//!     .progress_callback(counter as Arc<dyn CatalogueProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it processes each product row.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in row order on the calling thread.
pub trait CatalogueProgressCallback: Send + Sync {
    /// Called once after the product file is loaded.
    ///
    /// # Arguments
    /// * `total_rows`: number of product rows that will be considered
    fn on_run_start(&self, total_rows: usize) {
        let _ = total_rows;
    }

    /// Called after a card has been written to the cards directory.
    ///
    /// # Arguments
    /// * `index`: 1-indexed row position
    /// * `total`: total product rows
    /// * `model`: model identifier printed on the card
    fn on_card_rendered(&self, index: usize, total: usize, model: &str) {
        let _ = (index, total, model);
    }

    /// Called when a row has no `<model>.jpg` and is left out.
    fn on_row_skipped(&self, index: usize, total: usize, model: &str) {
        let _ = (index, total, model);
    }

    /// Called once after the PDF has been written.
    ///
    /// # Arguments
    /// * `cards`: cards placed in the catalogue
    /// * `pages`: pages in the written PDF
    fn on_run_complete(&self, cards: usize, pages: usize) {
        let _ = (cards, pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl CatalogueProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CatalogueConfig`].
pub type ProgressCallback = Arc<dyn CatalogueProgressCallback>;
