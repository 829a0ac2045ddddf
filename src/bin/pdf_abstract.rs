//! CLI binary for pdf-abstract.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_abstract::{
    acquire_text_async, process_batch, resolve_input, write_output, AcquisitionProgressCallback,
    ClassifierConfig, DocumentReport, ExtractionConfig, OcrFailurePolicy, ProgressCallback,
    TextSource,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// One bar over all documents; OCR pages are logged above it as they finish.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new(total_documents: usize) -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        let bar = ProgressBar::new(total_documents as u64);
        bar.set_style(style);
        bar.set_prefix("Extracting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl AcquisitionProgressCallback for CliProgressCallback {
    fn on_ocr_fallback(&self, direct_chars: usize, threshold: usize) {
        self.bar.println(format!(
            "  {} text layer has {} chars (< {}), running OCR",
            cyan("◆"),
            direct_chars,
            threshold
        ));
    }

    fn on_ocr_page_complete(&self, page_num: usize, total_pages: usize, chars: usize) {
        self.bar.println(format!(
            "  {} OCR page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(&format!("{chars:>5} chars")),
        ));
        self.bar.set_message(format!("OCR {page_num}/{total_pages}"));
    }

    fn on_ocr_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let msg: String = if error.chars().count() > 80 {
            let mut s: String = error.chars().take(79).collect();
            s.push('\u{2026}');
            s
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} OCR page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total_pages,
            red(&msg),
        ));
    }

    fn on_acquisition_complete(&self, _source: TextSource, _chars: usize) {
        self.bar.set_message(String::new());
    }

    fn on_document_complete(&self, _success: bool) {
        self.bar.inc(1);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Abstract of one paper (stdout)
  pdf-abstract paper.pdf

  # Several papers, JSON reports, four at a time
  pdf-abstract --json --concurrency 4 a.pdf b.pdf c.pdf -o abstracts.json

  # Scanned Indonesian thesis with Tesseract language data
  pdf-abstract --ocr-language ind --tessdata /usr/share/tessdata skripsi.pdf

  # Add SDG labels from the classifier service
  pdf-abstract --classify --json paper.pdf

  # Dump the acquired text instead of the abstract
  pdf-abstract --text-only https://arxiv.org/pdf/1706.03762

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to a specific libpdfium; default is the system library
  TESSDATA_PREFIX         Tesseract language data (overridden by --tessdata)
  RUST_LOG                Overrides the log filter chosen by -v / -q

EXIT STATUS:
  0 when every document produced an abstract, 1 otherwise.
"#;

/// Extract the abstract section from academic-paper PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-abstract",
    version,
    about = "Extract the abstract section from academic-paper PDFs",
    long_about = "Extract the abstract section from academic-paper PDFs (local files or URLs). \
Uses the embedded text layer when it is substantial and falls back to OCR for scanned \
documents. Optionally classifies each abstract against the UN Sustainable Development Goals.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file paths or HTTP/HTTPS URLs.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Write results to this file instead of stdout.
    #[arg(short, long, env = "PDF_ABSTRACT_OUTPUT")]
    output: Option<PathBuf>,

    /// Output JSON reports instead of plain text.
    #[arg(long, env = "PDF_ABSTRACT_JSON")]
    json: bool,

    /// Print the acquired document text instead of the abstract.
    #[arg(long, env = "PDF_ABSTRACT_TEXT_ONLY", conflicts_with_all = ["json", "classify"])]
    text_only: bool,

    /// Never run OCR, even for scanned documents.
    #[arg(long, env = "PDF_ABSTRACT_NO_OCR")]
    no_ocr: bool,

    /// Tesseract language code(s), e.g. eng, ind, eng+ind.
    #[arg(long, env = "PDF_ABSTRACT_OCR_LANGUAGE", default_value = "eng")]
    ocr_language: String,

    /// Tesseract language data directory.
    #[arg(long, env = "PDF_ABSTRACT_TESSDATA")]
    tessdata: Option<String>,

    /// Minimum text-layer characters before OCR is skipped.
    #[arg(long, env = "PDF_ABSTRACT_QUALITY_THRESHOLD", default_value_t = 500)]
    quality_threshold: usize,

    /// Word window used by the fallback heuristics.
    #[arg(long, env = "PDF_ABSTRACT_WORD_CAP", default_value_t = 300,
          value_parser = clap::value_parser!(u64).range(1..))]
    word_cap: u64,

    /// Raster scale for OCR pages (0.5–4.0; 1.0 = one pixel per point).
    #[arg(long, env = "PDF_ABSTRACT_RENDER_SCALE", default_value_t = 1.0)]
    render_scale: f32,

    /// Skip pages whose OCR fails instead of failing the document.
    #[arg(long, env = "PDF_ABSTRACT_SKIP_FAILED_PAGES")]
    skip_failed_pages: bool,

    /// Give up on OCR after this many seconds per document.
    #[arg(long, env = "PDF_ABSTRACT_OCR_TIMEOUT")]
    ocr_timeout: Option<u64>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_ABSTRACT_PASSWORD")]
    password: Option<String>,

    /// Classify each abstract with the SDG classifier service.
    #[arg(long, env = "PDF_ABSTRACT_CLASSIFY")]
    classify: bool,

    /// Classifier endpoint (implies --classify).
    #[arg(long, env = "PDF_ABSTRACT_CLASSIFIER_URL")]
    classifier_url: Option<String>,

    /// Drop classifier labels below this probability (0.0–1.0).
    #[arg(long, env = "PDF_ABSTRACT_MIN_CONFIDENCE", default_value_t = 0.15)]
    min_confidence: f64,

    /// Number of documents processed at once.
    #[arg(short, long, env = "PDF_ABSTRACT_CONCURRENCY", default_value_t = 2)]
    concurrency: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF_ABSTRACT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Disable progress bar.
    #[arg(long, env = "PDF_ABSTRACT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_ABSTRACT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_ABSTRACT_QUIET")]
    quiet: bool,
}

/// One element of the `--json` output.
#[derive(Serialize)]
struct JsonEntry<'a> {
    input: &'a str,
    #[serde(flatten)]
    report: &'a DocumentReport,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.text_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress = if show_progress {
        Some(CliProgressCallback::new(cli.inputs.len()))
    } else {
        None
    };
    let config = build_config(
        &cli,
        progress.clone().map(|cb| cb as Arc<dyn AcquisitionProgressCallback>),
    )?;

    let start = Instant::now();

    // ── Text-only mode ───────────────────────────────────────────────────
    if cli.text_only {
        let (rendered, failed) = dump_texts(&cli, &config).await;
        emit(&cli, &rendered).await?;
        if failed > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    // ── Run extraction ───────────────────────────────────────────────────
    let reports = process_batch(cli.inputs.as_slice(), &config, cli.concurrency).await;
    if let Some(cb) = progress {
        cb.bar.finish_and_clear();
    }

    if !cli.quiet {
        for (input, report) in cli.inputs.iter().zip(&reports) {
            if report.is_ungated() {
                eprintln!(
                    "{} {}: text layer is below the quality gate and OCR did not run \
                     (build with the `ocr` feature); the abstract may be incomplete",
                    cyan("◆"),
                    input
                );
            }
        }
    }

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    let rendered = if cli.json {
        render_json(&cli.inputs, &reports)?
    } else {
        render_text(&cli.inputs, &reports)
    };
    emit(&cli, &rendered).await?;

    if !cli.quiet {
        let done = reports.len() - failed;
        eprintln!(
            "{}  {}/{} documents  {}ms",
            if failed == 0 { green("✔") } else { red("✘") },
            done,
            reports.len(),
            start.elapsed().as_millis(),
        );
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .quality_threshold(cli.quality_threshold)
        .word_cap(cli.word_cap as usize)
        .ocr_enabled(!cli.no_ocr)
        .ocr_language(cli.ocr_language.clone())
        .render_scale(cli.render_scale)
        .download_timeout_secs(cli.download_timeout)
        .ocr_failure_policy(if cli.skip_failed_pages {
            OcrFailurePolicy::SkipPage
        } else {
            OcrFailurePolicy::Abort
        });

    if let Some(ref dir) = cli.tessdata {
        builder = builder.tessdata_path(dir.clone());
    }
    if let Some(secs) = cli.ocr_timeout {
        builder = builder.ocr_timeout_secs(secs);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if cli.classify || cli.classifier_url.is_some() {
        let mut classifier = ClassifierConfig {
            min_confidence: cli.min_confidence,
            ..ClassifierConfig::default()
        };
        if let Some(ref url) = cli.classifier_url {
            classifier.endpoint = url.clone();
        }
        builder = builder.classifier(classifier);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Acquire each input's full text, one document at a time.
async fn dump_texts(cli: &Cli, config: &ExtractionConfig) -> (String, usize) {
    let mut out = String::new();
    let mut failed = 0;
    let many = cli.inputs.len() > 1;

    for input in &cli.inputs {
        let text = match resolve_input(input, config.download_timeout_secs).await {
            Ok(resolved) => acquire_text_async(resolved.path(), config).await,
            Err(e) => Err(e),
        };
        match text {
            Ok(text) => {
                if many {
                    out.push_str(&format!("==> {input} <==\n"));
                }
                out.push_str(&text);
                if !text.ends_with('\n') {
                    out.push('\n');
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", red("✗"), input, e);
            }
        }
    }
    (out, failed)
}

fn render_text(inputs: &[String], reports: &[DocumentReport]) -> String {
    let mut out = String::new();
    let many = inputs.len() > 1;

    for (input, report) in inputs.iter().zip(reports) {
        match report {
            DocumentReport::Success {
                abstract_text, sdg, ..
            } => {
                if many {
                    out.push_str(&format!("==> {input} <==\n"));
                }
                out.push_str(abstract_text);
                out.push('\n');
                for label in sdg.iter().flatten() {
                    out.push_str(&format!("  [{:>6.2}%] {}\n", label.score, label.label));
                }
                if many {
                    out.push('\n');
                }
            }
            DocumentReport::Error { message } => {
                eprintln!("{} {}: {}", red("✗"), input, message);
            }
        }
    }
    out
}

fn render_json(inputs: &[String], reports: &[DocumentReport]) -> Result<String> {
    let json = if let [report] = reports {
        serde_json::to_string_pretty(report)
    } else {
        let entries: Vec<JsonEntry<'_>> = inputs
            .iter()
            .zip(reports)
            .map(|(input, report)| JsonEntry { input, report })
            .collect();
        serde_json::to_string_pretty(&entries)
    }
    .context("Failed to serialise output")?;
    Ok(json + "\n")
}

/// Write to `--output` (atomically) or stdout.
async fn emit(cli: &Cli, rendered: &str) -> Result<()> {
    if let Some(ref path) = cli.output {
        write_output(path, rendered)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} wrote {}", green("→"), path.display());
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
    }
    Ok(())
}
