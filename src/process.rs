//! Whole-document processing: resolve → acquire → segment → classify.
//!
//! [`process_document`] is the entry point behind the CLI and the one most
//! library users want. It never returns `Err`; a document that cannot be
//! read becomes a [`DocumentReport::Error`] so a batch keeps going and every
//! input gets exactly one report.

use crate::acquire::acquire_async;
use crate::classify::Classifier;
use crate::config::ExtractionConfig;
use crate::error::AbstractError;
use crate::output::DocumentReport;
use crate::pipeline::input;
use crate::segment::Segmenter;
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Extract (and optionally classify) the abstract of one PDF path or URL.
///
/// # Example
/// ```rust,no_run
/// use pdf_abstract::{process_document, ExtractionConfig};
///
/// # #[tokio::main]
/// # async fn main() {
/// let report = process_document("paper.pdf", &ExtractionConfig::default()).await;
/// println!("{}", serde_json::to_string_pretty(&report).unwrap());
/// # }
/// ```
pub async fn process_document(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> DocumentReport {
    let classifier = build_classifier(config);
    process_with(input_str.as_ref(), config, classifier.as_ref()).await
}

/// Process PDF bytes held in memory.
///
/// The bytes are written to a [`tempfile::NamedTempFile`] that is removed
/// when this function returns.
pub async fn process_bytes(bytes: &[u8], config: &ExtractionConfig) -> DocumentReport {
    let tmp = match write_temp_pdf(bytes) {
        Ok(tmp) => tmp,
        Err(e) => return error_report("<bytes>", e),
    };
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) after processing
    process_document(&path, config).await
}

/// Process many inputs with at most `concurrency` documents in flight.
///
/// Reports come back in input order regardless of completion order.
pub async fn process_batch<S: AsRef<str>>(
    inputs: &[S],
    config: &ExtractionConfig,
    concurrency: usize,
) -> Vec<DocumentReport> {
    let classifier = build_classifier(config);
    let classifier = classifier.as_ref();

    let mut indexed: Vec<(usize, DocumentReport)> =
        stream::iter(inputs.iter().enumerate().map(|(idx, input_str)| async move {
            (idx, process_with(input_str.as_ref(), config, classifier).await)
        }))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    indexed.sort_by_key(|(idx, _)| *idx);
    indexed.into_iter().map(|(_, report)| report).collect()
}

/// Write `contents` to `path` atomically (temp file + rename).
pub async fn write_output(path: impl AsRef<Path>, contents: &str) -> Result<(), AbstractError> {
    let path = path.as_ref();
    let fail = |e: std::io::Error| AbstractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(fail)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents).await.map_err(fail)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(fail)?;
    Ok(())
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn process_with(
    input_str: &str,
    config: &ExtractionConfig,
    classifier: Option<&Classifier>,
) -> DocumentReport {
    let report = match run(input_str, config, classifier).await {
        Ok(report) => report,
        Err(e) => error_report(input_str, e),
    };
    if let Some(cb) = &config.progress_callback {
        cb.on_document_complete(report.is_success());
    }
    report
}

async fn run(
    input_str: &str,
    config: &ExtractionConfig,
    classifier: Option<&Classifier>,
) -> Result<DocumentReport, AbstractError> {
    let start = Instant::now();
    info!("Processing: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;

    // ── Step 2: Acquire text ─────────────────────────────────────────────
    let acquired = acquire_async(resolved.path(), config).await?;
    if !acquired.skipped_pages.is_empty() {
        warn!(
            "{}: OCR skipped pages {:?}",
            input_str, acquired.skipped_pages
        );
    }

    // ── Step 3: Segment ──────────────────────────────────────────────────
    let segmentation = Segmenter::new(config.word_cap).segment(&acquired.text);

    // ── Step 4: Classify ─────────────────────────────────────────────────
    let sdg = match (classifier, config.classifier.is_some()) {
        (Some(c), _) => Some(c.classify(&segmentation.text).await),
        (None, true) => Some(Vec::new()),
        (None, false) => None,
    };

    info!(
        "{}: abstract of {} words via {} ({} pages, {}) in {}ms",
        input_str,
        segmentation.text.split_whitespace().count(),
        segmentation.strategy,
        acquired.page_count,
        acquired.source,
        start.elapsed().as_millis()
    );

    Ok(DocumentReport::Success {
        abstract_text: segmentation.text,
        sdg,
        source: acquired.source,
        page_count: acquired.page_count,
        strategy: segmentation.strategy,
    })
}

/// `None` when no classifier is configured or its client cannot be built;
/// the latter is logged and reported as zero labels.
fn build_classifier(config: &ExtractionConfig) -> Option<Classifier> {
    let cfg = config.classifier.clone()?;
    match Classifier::new(cfg) {
        Ok(c) => Some(c),
        Err(e) => {
            error!("Could not create classifier client: {}", e);
            None
        }
    }
}

fn write_temp_pdf(bytes: &[u8]) -> Result<tempfile::NamedTempFile, AbstractError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| AbstractError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| AbstractError::Internal(format!("tempfile write: {e}")))?;
    Ok(tmp)
}

fn error_report(input_str: &str, e: AbstractError) -> DocumentReport {
    error!("{}: {}", input_str, e);
    DocumentReport::Error {
        message: e.to_string(),
    }
}
