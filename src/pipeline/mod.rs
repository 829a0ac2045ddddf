//! Pipeline stages for getting text out of a PDF.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the OCR backend can be swapped without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ document ──────────────▶ text layer ──▶ quality gate
//! (URL/path) (pdfium)                                   │ too short
//!               └──▶ render ──▶ binarize ──▶ ocr ◀──────┘
//!                   (raster)    (Otsu)    (Tesseract)
//! ```
//!
//! 1. [`input`]    — canonicalise the user-supplied path or URL to a local file
//! 2. [`document`] — open the PDF, read each page's text layer, rasterise
//!    pages on demand; blocking, because pdfium is not async-safe
//! 3. [`binarize`] — grayscale plus Otsu threshold ahead of recognition
//! 4. [`ocr`]      — the pluggable recognition engine
//!
//! The gate itself and the order of the stages live in [`crate::acquire`].

pub mod binarize;
pub mod document;
pub mod input;
pub mod ocr;
