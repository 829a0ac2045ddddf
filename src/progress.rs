//! Progress-callback trait for acquisition events.
//!
//! Inject an [`Arc<dyn AcquisitionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to hear
//! about the slow part of the pipeline: the OCR fallback, which recognises
//! one page at a time and can run for minutes on a long scan.
//!
//! # Example
//!
//! ```rust
//! use pdf_abstract::{AcquisitionProgressCallback, ExtractionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct OcrCounter {
//!     pages: AtomicUsize,
//! }
//!
//! impl AcquisitionProgressCallback for OcrCounter {
//!     fn on_ocr_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
//!         self.pages.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("OCR page {}/{}: {} chars", page_num, total_pages, chars);
//!     }
//! }
//!
//! let counter = Arc::new(OcrCounter { pages: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn AcquisitionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::TextSource;
use std::sync::Arc;

/// Called by text acquisition as it works through a document.
///
/// Implementations must be `Send + Sync`: batch processing runs several
/// documents on blocking threads at once. All methods default to no-ops.
pub trait AcquisitionProgressCallback: Send + Sync {
    /// Called once the document is open.
    ///
    /// # Arguments
    /// * `total_pages` — page count of the document
    fn on_acquisition_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called when the text layer fails the quality gate and OCR begins.
    ///
    /// # Arguments
    /// * `direct_chars` — trimmed character count of the rejected text layer
    /// * `threshold`    — the configured quality threshold
    fn on_ocr_fallback(&self, direct_chars: usize, threshold: usize) {
        let _ = (direct_chars, threshold);
    }

    /// Called after each page has been recognised.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — total pages in the document
    /// * `chars`       — characters recognised on this page
    fn on_ocr_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        let _ = (page_num, total_pages, chars);
    }

    /// Called when a page is skipped under `OcrFailurePolicy::SkipPage`.
    fn on_ocr_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once acquisition has produced its final text.
    fn on_acquisition_complete(&self, source: TextSource, chars: usize) {
        let _ = (source, chars);
    }

    /// Called by [`crate::process_document`] and [`crate::process_batch`]
    /// once a document's report is ready, whether it succeeded or not.
    fn on_document_complete(&self, success: bool) {
        let _ = success;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AcquisitionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn AcquisitionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        fallbacks: AtomicUsize,
        ocr_pages: AtomicUsize,
        ocr_errors: AtomicUsize,
        completed_chars: AtomicUsize,
    }

    impl AcquisitionProgressCallback for TrackingCallback {
        fn on_ocr_fallback(&self, _direct_chars: usize, _threshold: usize) {
            self.fallbacks.fetch_add(1, Ordering::SeqCst);
        }

        fn on_ocr_page_complete(&self, _page_num: usize, _total_pages: usize, _chars: usize) {
            self.ocr_pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_ocr_page_error(&self, _page_num: usize, _total_pages: usize, _error: &str) {
            self.ocr_errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_acquisition_complete(&self, _source: TextSource, chars: usize) {
            self.completed_chars.store(chars, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_acquisition_start(5);
        cb.on_ocr_fallback(12, 500);
        cb.on_ocr_page_complete(1, 5, 42);
        cb.on_ocr_page_error(2, 5, "some error");
        cb.on_acquisition_complete(TextSource::Ocr, 42);
        cb.on_document_complete(false);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            fallbacks: AtomicUsize::new(0),
            ocr_pages: AtomicUsize::new(0),
            ocr_errors: AtomicUsize::new(0),
            completed_chars: AtomicUsize::new(0),
        };

        tracker.on_ocr_fallback(10, 500);
        tracker.on_ocr_page_complete(1, 2, 300);
        tracker.on_ocr_page_error(2, 2, "engine crashed");
        tracker.on_acquisition_complete(TextSource::Ocr, 300);

        assert_eq!(tracker.fallbacks.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.ocr_pages.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.ocr_errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completed_chars.load(Ordering::SeqCst), 300);
    }
}
