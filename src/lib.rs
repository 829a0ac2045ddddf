//! # pdf-abstract
//!
//! Pull the abstract out of academic-paper PDFs, born-digital or scanned.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Acquire   text layer via pdfium; below the quality gate,
//!  │               rasterise → Otsu binarise → OCR (spawn_blocking)
//!  ├─ 3. Segment   ordered heuristics: anchor→heading, anchor window,
//!  │               paragraph before heading, words before heading, lead words
//!  └─ 4. Classify  optional remote SDG classifier, never fatal
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_abstract::{acquire_text, segment_abstract, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let text = acquire_text("paper.pdf", &ExtractionConfig::default())?;
//!     println!("{}", segment_abstract(&text));
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-abstract` binary (clap + anyhow + indicatif + tracing-subscriber) |
//! | `ocr`   | off     | Built-in Tesseract engine; needs libtesseract and libleptonica |
//!
//! Without `ocr`, scanned documents are only recognised when an
//! [`OcrEngine`] is injected through the config; otherwise their (thin) text
//! layer is returned as is.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod acquire;
pub mod classify;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod segment;
pub mod text;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use acquire::{acquire, acquire_async, acquire_from_source, acquire_text, acquire_text_async};
pub use classify::Classifier;
pub use config::{ClassifierConfig, ExtractionConfig, ExtractionConfigBuilder, OcrFailurePolicy};
pub use error::{AbstractError, ClassificationError, OcrEngineError};
pub use output::{AcquiredText, Classification, DocumentReport, TextSource};
pub use pipeline::document::DocumentSource;
pub use pipeline::input::{resolve_input, ResolvedInput};
pub use pipeline::ocr::OcrEngine;
#[cfg(feature = "ocr")]
pub use pipeline::ocr::TesseractEngine;
pub use process::{process_batch, process_bytes, process_document, write_output};
pub use progress::{AcquisitionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use segment::{segment_abstract, SegmentStrategy, Segmentation, Segmenter};
pub use text::CleanedText;
