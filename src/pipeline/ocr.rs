//! Optical character recognition of binarised page images.
//!
//! Recognition goes through the [`OcrEngine`] trait. With the `ocr` feature
//! the crate ships [`TesseractEngine`]; callers can also inject their own
//! engine through [`crate::config::ExtractionConfigBuilder::ocr_engine`].

use crate::config::ExtractionConfig;
use crate::error::OcrEngineError;
use image::GrayImage;
use std::sync::Arc;
use tracing::debug;

/// Turns one black-and-white page image into text.
///
/// Engines are shared across blocking threads during batch runs, hence
/// `Send + Sync`.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrEngineError>;
}

/// Pick the engine for `config`: the injected one, else the built-in
/// Tesseract engine when compiled in, else none.
pub fn default_engine(config: &ExtractionConfig) -> Option<Arc<dyn OcrEngine>> {
    if !config.ocr_enabled {
        debug!("OCR disabled by configuration");
        return None;
    }
    if let Some(engine) = &config.ocr_engine {
        return Some(Arc::clone(engine));
    }
    builtin_engine(config)
}

#[cfg(feature = "ocr")]
fn builtin_engine(config: &ExtractionConfig) -> Option<Arc<dyn OcrEngine>> {
    Some(Arc::new(TesseractEngine::new(
        config.ocr_language.clone(),
        config.tessdata_path.clone(),
    )))
}

#[cfg(not(feature = "ocr"))]
fn builtin_engine(_config: &ExtractionConfig) -> Option<Arc<dyn OcrEngine>> {
    tracing::warn!("Built without the `ocr` feature and no OCR engine was supplied");
    None
}

#[cfg(feature = "ocr")]
pub use tesseract_engine::TesseractEngine;

#[cfg(feature = "ocr")]
mod tesseract_engine {
    use super::*;
    use std::cell::RefCell;
    use tesseract::Tesseract;

    /// A loaded handle and the (language, datapath) it was loaded with.
    struct CachedHandle {
        language: String,
        datapath: Option<String>,
        tess: Tesseract,
    }

    thread_local! {
        static HANDLE: RefCell<Option<CachedHandle>> = const { RefCell::new(None) };
    }

    /// Tesseract via the system `libtesseract`.
    ///
    /// Each worker thread keeps one loaded handle and reuses it for later
    /// pages with the same language and data path, so the language data is
    /// loaded once per thread rather than once per page.
    #[derive(Debug, Clone)]
    pub struct TesseractEngine {
        language: String,
        datapath: Option<String>,
    }

    impl TesseractEngine {
        /// `language` is a Tesseract code such as `"eng"` or `"eng+ind"`.
        pub fn new(language: impl Into<String>, datapath: Option<String>) -> Self {
            Self {
                language: language.into(),
                datapath,
            }
        }

        pub fn language(&self) -> &str {
            &self.language
        }

        /// Whether the current thread holds a handle this engine can reuse.
        pub fn is_warm(&self) -> bool {
            HANDLE.with(|cell| {
                cell.borrow()
                    .as_ref()
                    .is_some_and(|cached| self.matches(cached))
            })
        }

        fn matches(&self, cached: &CachedHandle) -> bool {
            cached.language == self.language && cached.datapath == self.datapath
        }

        fn checkout(&self, slot: &mut Option<CachedHandle>) -> Result<Tesseract, OcrEngineError> {
            match slot.take() {
                Some(cached) if self.matches(&cached) => Ok(cached.tess),
                _ => {
                    debug!("Loading Tesseract language data for {}", self.language);
                    Tesseract::new(self.datapath.as_deref(), Some(self.language.as_str()))
                        .map_err(|e| OcrEngineError::Init(e.to_string()))
                }
            }
        }
    }

    impl OcrEngine for TesseractEngine {
        fn recognize(&self, image: &GrayImage) -> Result<String, OcrEngineError> {
            let (width, height) = image.dimensions();
            HANDLE.with(|cell| {
                let mut slot = cell.borrow_mut();
                // set_frame consumes the handle; a failed page leaves the slot
                // empty and the next page loads a fresh one.
                let tess = self.checkout(&mut slot)?;
                let mut tess = tess
                    .set_frame(
                        image.as_raw(),
                        width as i32,
                        height as i32,
                        1,
                        width as i32,
                    )
                    .map_err(|e| OcrEngineError::Recognition(e.to_string()))?;
                let text = tess
                    .get_text()
                    .map_err(|e| OcrEngineError::Recognition(e.to_string()))?;
                *slot = Some(CachedHandle {
                    language: self.language.clone(),
                    datapath: self.datapath.clone(),
                    tess,
                });
                debug!(
                    "Tesseract ({}) recognised {} chars from {}x{} image",
                    self.language,
                    text.len(),
                    width,
                    height
                );
                Ok(text)
            })
        }
    }
}
