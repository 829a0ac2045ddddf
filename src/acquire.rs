//! Text acquisition: the text layer when it is good enough, OCR otherwise.
//!
//! ## The quality gate
//!
//! Born-digital PDFs carry a text layer that is exact and free to read.
//! Scanned PDFs carry none, or a few stray characters from a cover stamp.
//! The gate compares the trimmed character count of the cleaned text layer
//! against [`ExtractionConfig::quality_threshold`]; below it every page is
//! rasterised, binarised and recognised instead. OCR output is returned as
//! is, without a second pass through the gate.
//!
//! All functions here are blocking except [`acquire_async`] and
//! [`acquire_text_async`], which hop onto `spawn_blocking`.

use crate::config::{ExtractionConfig, OcrFailurePolicy};
use crate::error::{AbstractError, OcrEngineError};
use crate::output::{AcquiredText, TextSource};
use crate::pipeline::binarize::binarize;
use crate::pipeline::document::{with_pdf_document, DocumentSource};
use crate::pipeline::ocr::{default_engine, OcrEngine};
use crate::text::CleanedText;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Acquire the cleaned text of the PDF at `path`.
///
/// # Errors
/// Fatal errors only: the document cannot be opened, a page's text layer
/// cannot be read, or OCR fails under [`OcrFailurePolicy::Abort`].
pub fn acquire_text(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<CleanedText, AbstractError> {
    acquire(path, config).map(|acquired| acquired.text)
}

/// Like [`acquire_text`], but also reports which path produced the text.
pub fn acquire(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<AcquiredText, AbstractError> {
    let path = path.as_ref();
    let engine = default_engine(config);
    with_pdf_document(path, config.password.as_deref(), |document| {
        acquire_from_source(document, engine.as_deref(), config)
    })
}

/// Run [`acquire`] on the blocking thread pool.
pub async fn acquire_async(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<AcquiredText, AbstractError> {
    let path = path.as_ref().to_path_buf();
    let config = config.clone();
    tokio::task::spawn_blocking(move || acquire(&path, &config))
        .await
        .map_err(|e| AbstractError::Internal(format!("Acquisition task panicked: {}", e)))?
}

/// Run [`acquire_text`] on the blocking thread pool.
pub async fn acquire_text_async(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<CleanedText, AbstractError> {
    acquire_async(path, config).await.map(|acquired| acquired.text)
}

/// The gate-then-OCR algorithm over any [`DocumentSource`].
///
/// `engine` is `None` when OCR is disabled or unavailable; the text layer is
/// then returned even when it fails the gate.
pub fn acquire_from_source<S: DocumentSource + ?Sized>(
    source: &S,
    engine: Option<&dyn OcrEngine>,
    config: &ExtractionConfig,
) -> Result<AcquiredText, AbstractError> {
    let total_pages = source.page_count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_acquisition_start(total_pages);
    }

    // ── Step 1: Text layer ───────────────────────────────────────────────
    let direct = read_text_layer(source)?;
    let direct_chars = direct.trimmed_char_count();
    debug!(
        "Text layer: {} chars over {} pages (threshold {})",
        direct_chars, total_pages, config.quality_threshold
    );

    // ── Step 2: Quality gate ─────────────────────────────────────────────
    let (text, source_kind, skipped_pages) = if direct_chars >= config.quality_threshold {
        (direct, TextSource::TextLayer, Vec::new())
    } else if let Some(engine) = engine {
        warn!(
            "Text layer has {} chars (< {}), falling back to OCR on {} pages",
            direct_chars, config.quality_threshold, total_pages
        );
        if let Some(ref cb) = config.progress_callback {
            cb.on_ocr_fallback(direct_chars, config.quality_threshold);
        }
        // ── Step 3: OCR ──────────────────────────────────────────────────
        let (ocr_text, skipped) = ocr_document(source, engine, config)?;
        (ocr_text, TextSource::Ocr, skipped)
    } else {
        warn!(
            "Text layer has {} chars (< {}) but no OCR engine is available; using it anyway",
            direct_chars, config.quality_threshold
        );
        (direct, TextSource::TextLayerUngated, Vec::new())
    };

    let chars = text.trimmed_char_count();
    info!("Acquired {} chars via {}", chars, source_kind);
    if let Some(ref cb) = config.progress_callback {
        cb.on_acquisition_complete(source_kind, chars);
    }

    Ok(AcquiredText {
        text,
        source: source_kind,
        page_count: total_pages,
        text_layer_chars: direct_chars,
        skipped_pages,
    })
}

/// Every page's embedded text, in page order, joined by `"\n"`.
fn read_text_layer<S: DocumentSource + ?Sized>(source: &S) -> Result<CleanedText, AbstractError> {
    let pages = (0..source.page_count())
        .map(|idx| source.page_text(idx))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CleanedText::new(&pages.join("\n")))
}

/// Recognise every page. Returns the joined text and the 1-indexed pages
/// skipped under [`OcrFailurePolicy::SkipPage`].
fn ocr_document<S: DocumentSource + ?Sized>(
    source: &S,
    engine: &dyn OcrEngine,
    config: &ExtractionConfig,
) -> Result<(CleanedText, Vec<usize>), AbstractError> {
    let total = source.page_count();
    let started = Instant::now();
    let deadline = config.ocr_timeout_secs.map(Duration::from_secs);

    let mut page_texts = Vec::with_capacity(total);
    let mut skipped = Vec::new();

    for idx in 0..total {
        let page_num = idx + 1;

        if let Some(limit) = deadline {
            if started.elapsed() >= limit {
                return Err(AbstractError::OcrTimeout {
                    secs: limit.as_secs(),
                    pages_done: idx,
                    total,
                });
            }
        }

        match ocr_page(source, engine, idx, config) {
            Ok(text) => {
                debug!("OCR page {}/{}: {} chars", page_num, total, text.len());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_ocr_page_complete(page_num, total, text.chars().count());
                }
                page_texts.push(text);
            }
            Err(PageFailure::Fatal(e)) => return Err(e),
            Err(PageFailure::Page(e)) => match config.ocr_failure_policy {
                OcrFailurePolicy::Abort => return Err(e),
                OcrFailurePolicy::SkipPage => {
                    warn!("Skipping page {}/{}: {}", page_num, total, e);
                    if let Some(ref cb) = config.progress_callback {
                        cb.on_ocr_page_error(page_num, total, &e.to_string());
                    }
                    skipped.push(page_num);
                }
            },
        }
    }

    Ok((CleanedText::new(&page_texts.join("\n")), skipped))
}

/// A page-level failure is subject to the failure policy; a fatal one is not.
enum PageFailure {
    Page(AbstractError),
    Fatal(AbstractError),
}

fn ocr_page<S: DocumentSource + ?Sized>(
    source: &S,
    engine: &dyn OcrEngine,
    idx: usize,
    config: &ExtractionConfig,
) -> Result<String, PageFailure> {
    let image = source
        .render_page(idx, config.render_scale)
        .map_err(PageFailure::Page)?;
    let bw = binarize(&image);
    engine.recognize(&bw).map_err(|e| match e {
        OcrEngineError::Init(detail) => PageFailure::Fatal(AbstractError::OcrInitFailed {
            language: config.ocr_language.clone(),
            detail,
        }),
        OcrEngineError::Recognition(detail) => PageFailure::Page(AbstractError::OcrFailed {
            page: idx + 1,
            detail,
        }),
    })
}
