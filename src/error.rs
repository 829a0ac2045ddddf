//! Error types for the pdf-abstract library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`AbstractError`] — **Fatal**: the document cannot be read at all
//!   (missing file, corrupt PDF, OCR engine failure). Returned as
//!   `Err(AbstractError)` from [`crate::acquire::acquire_text`] and friends,
//!   and turned into a [`crate::output::DocumentReport::Error`] by
//!   [`crate::process::process_document`].
//!
//! * [`ClassificationError`] — **Non-fatal**: the remote classifier could not
//!   be reached or answered badly. It never leaves
//!   [`crate::classify::Classifier::classify`]; the failure is logged and the
//!   document simply reports zero classifications.
//!
//! Segmentation has no error type: it always degrades to a fallback string.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-abstract library.
#[derive(Debug, Error)]
pub enum AbstractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The text layer of a page could not be read.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    /// pdfium-render could not rasterise a page for OCR.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine could not be initialised (missing language data etc.).
    #[error("OCR engine unavailable for language '{language}': {detail}")]
    OcrInitFailed { language: String, detail: String },

    /// Recognition failed on a page and the failure policy is `Abort`.
    #[error("OCR failed for page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    /// The OCR deadline passed before every page was recognised.
    #[error("OCR exceeded the {secs}s deadline after {pages_done}/{total} pages")]
    OcrTimeout {
        secs: u64,
        pages_done: usize,
        total: usize,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium system-wide, or set PDFIUM_LIB_PATH=/path/to/libpdfium\n\
to load a specific copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure talking to the classification service.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// Connection refused, DNS failure, timeout…
    #[error("classifier request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("classifier returned HTTP {status}")]
    Status { status: u16 },

    /// The body was not the expected JSON shape.
    #[error("classifier response could not be decoded: {0}")]
    Decode(String),
}

/// Failure reported by an [`crate::pipeline::ocr::OcrEngine`].
#[derive(Debug, Error)]
pub enum OcrEngineError {
    /// The engine could not start; retrying other pages will not help.
    #[error("engine initialisation failed: {0}")]
    Init(String),

    /// Recognition of this image failed.
    #[error("{0}")]
    Recognition(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_timeout_display() {
        let e = AbstractError::OcrTimeout {
            secs: 30,
            pages_done: 2,
            total: 7,
        };
        let msg = e.to_string();
        assert!(msg.contains("30s"), "got: {msg}");
        assert!(msg.contains("2/7"), "got: {msg}");
    }

    #[test]
    fn ocr_failed_display() {
        let e = AbstractError::OcrFailed {
            page: 4,
            detail: "no text block".into(),
        };
        assert!(e.to_string().contains("page 4"));
        assert!(e.to_string().contains("no text block"));
    }

    #[test]
    fn not_a_pdf_display_shows_magic() {
        let e = AbstractError::NotAPdf {
            path: PathBuf::from("/tmp/x.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("/tmp/x.pdf"));
    }

    #[test]
    fn classification_status_display() {
        let e = ClassificationError::Status { status: 503 };
        assert!(e.to_string().contains("503"));
    }
}
