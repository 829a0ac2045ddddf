//! PDF access through pdfium: page count, text layer and page rasters.
//!
//! Everything in this module is blocking. pdfium keeps thread-local state
//! and is not safe to drive from async tasks, so async callers go through
//! `tokio::task::spawn_blocking` (see [`crate::acquire::acquire_text_async`]).
//!
//! Documents are only reachable inside [`with_pdf_document`]; the pdfium
//! handle and the open document are released when the closure returns, on
//! every path including errors.

use crate::error::AbstractError;
use crate::text::normalise_line_endings;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read-only view of an open document, one page at a time.
///
/// Page indices are 0-based. Implemented by [`PdfiumDocument`]; tests supply
/// in-memory fakes.
pub trait DocumentSource {
    fn page_count(&self) -> usize;

    /// Embedded text of one page, line endings normalised to `\n`.
    fn page_text(&self, index: usize) -> Result<String, AbstractError>;

    /// Rasterise one page. `scale` 1.0 is one pixel per PDF point.
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, AbstractError>;
}

/// Bind to the pdfium shared library.
///
/// `PDFIUM_LIB_PATH` names a specific library file; otherwise the platform's
/// system library search path is used.
pub fn bind_pdfium() -> Result<Pdfium, AbstractError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.trim().is_empty() => {
            debug!("Binding pdfium from PDFIUM_LIB_PATH={}", path);
            Pdfium::bind_to_library(Path::new(&path))
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| AbstractError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// An open pdfium document.
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
    page_count: usize,
}

impl<'a> PdfiumDocument<'a> {
    fn new(document: PdfDocument<'a>) -> Self {
        let page_count = document.pages().len() as usize;
        Self {
            document,
            page_count,
        }
    }

    fn page(&self, index: usize) -> Result<PdfPage<'a>, PdfiumError> {
        self.document.pages().get(index as u16)
    }
}

impl DocumentSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, AbstractError> {
        let fail = |e: PdfiumError| AbstractError::TextExtractionFailed {
            page: index + 1,
            detail: format!("{:?}", e),
        };
        let page = self.page(index).map_err(fail)?;
        let text = page.text().map_err(fail)?.all();
        Ok(normalise_line_endings(&text))
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, AbstractError> {
        let fail = |e: PdfiumError| AbstractError::RasterisationFailed {
            page: index + 1,
            detail: format!("{:?}", e),
        };
        let page = self.page(index).map_err(fail)?;
        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page.render_with_config(&render_config).map_err(fail)?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

/// Open `path`, run `f` against it, and close it again.
pub fn with_pdf_document<T>(
    path: &Path,
    password: Option<&str>,
    f: impl FnOnce(&PdfiumDocument<'_>) -> Result<T, AbstractError>,
) -> Result<T, AbstractError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(path, password)
        .map_err(|e| map_load_error(path, password, e))?;

    let source = PdfiumDocument::new(document);
    info!("PDF loaded: {} pages", source.page_count());
    f(&source)
}

fn map_load_error(path: &Path, password: Option<&str>, e: PdfiumError) -> AbstractError {
    let path: PathBuf = path.to_path_buf();
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            AbstractError::WrongPassword { path }
        } else {
            AbstractError::PasswordRequired { path }
        }
    } else {
        AbstractError::CorruptPdf {
            path,
            detail: err_str,
        }
    }
}
