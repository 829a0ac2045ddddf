//! Configuration types for abstract extraction.
//!
//! All pipeline behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The OCR settings that a script would
//! normally keep as process-wide globals (engine language, data path) live
//! here too, so two configs with different OCR languages can be used side by
//! side in the same process.

use crate::error::AbstractError;
use crate::pipeline::ocr::OcrEngine;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default minimum trimmed character count for the text layer to be trusted.
pub const DEFAULT_QUALITY_THRESHOLD: usize = 500;

/// Default word window used by the segmentation fallbacks.
pub const DEFAULT_WORD_CAP: usize = 300;

/// Default Tesseract language.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Aurora SDG multi-label classifier.
pub const DEFAULT_CLASSIFIER_ENDPOINT: &str =
    "https://aurora-sdg.labs.vu.nl/classifier/classify/aurora-sdg-multi";

/// Predictions below this confidence (0–1) are dropped.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.15;

/// Configuration for extracting the abstract of one or more PDFs.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_abstract::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .quality_threshold(800)
///     .ocr_language("ind")
///     .build()
///     .unwrap();
/// assert_eq!(config.ocr_language, "ind");
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Minimum trimmed character count of the text layer. Default: 500.
    ///
    /// A PDF whose embedded text is shorter than this is treated as scanned
    /// and re-read with OCR. The value is a corpus-level heuristic, not a
    /// measured constant; tune it for your documents.
    pub quality_threshold: usize,

    /// Word window for the segmentation fallbacks. Default: 300.
    pub word_cap: usize,

    /// Allow the OCR fallback at all. Default: true.
    pub ocr_enabled: bool,

    /// Recognition language passed to the OCR engine. Default: `"eng"`.
    pub ocr_language: String,

    /// Tesseract data directory. `None` lets Tesseract use `TESSDATA_PREFIX`
    /// or its compiled-in default.
    pub tessdata_path: Option<String>,

    /// Page raster scale for OCR; 1.0 renders one pixel per PDF point.
    /// Range: 0.5–4.0. Default: 1.0.
    pub render_scale: f32,

    /// What to do when recognition fails on a single page. Default: `Abort`.
    pub ocr_failure_policy: OcrFailurePolicy,

    /// Give up on OCR once this many seconds have passed. Checked before each
    /// page, so a single slow page can overrun it. Default: None (no limit).
    pub ocr_timeout_secs: Option<u64>,

    /// Pre-constructed OCR engine. Takes precedence over `ocr_language` /
    /// `tessdata_path`.
    pub ocr_engine: Option<Arc<dyn OcrEngine>>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Remote classifier settings. `None` skips classification.
    pub classifier: Option<ClassifierConfig>,

    /// Optional progress callback for acquisition events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            word_cap: DEFAULT_WORD_CAP,
            ocr_enabled: true,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            tessdata_path: None,
            render_scale: 1.0,
            ocr_failure_policy: OcrFailurePolicy::default(),
            ocr_timeout_secs: None,
            ocr_engine: None,
            password: None,
            download_timeout_secs: 120,
            classifier: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("quality_threshold", &self.quality_threshold)
            .field("word_cap", &self.word_cap)
            .field("ocr_enabled", &self.ocr_enabled)
            .field("ocr_language", &self.ocr_language)
            .field("tessdata_path", &self.tessdata_path)
            .field("render_scale", &self.render_scale)
            .field("ocr_failure_policy", &self.ocr_failure_policy)
            .field("ocr_timeout_secs", &self.ocr_timeout_secs)
            .field("ocr_engine", &self.ocr_engine.as_ref().map(|_| "<dyn OcrEngine>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("classifier", &self.classifier)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn quality_threshold(mut self, chars: usize) -> Self {
        self.config.quality_threshold = chars;
        self
    }

    pub fn word_cap(mut self, words: usize) -> Self {
        self.config.word_cap = words;
        self
    }

    pub fn ocr_enabled(mut self, v: bool) -> Self {
        self.config.ocr_enabled = v;
        self
    }

    pub fn ocr_language(mut self, lang: impl Into<String>) -> Self {
        self.config.ocr_language = lang.into();
        self
    }

    pub fn tessdata_path(mut self, path: impl Into<String>) -> Self {
        self.config.tessdata_path = Some(path.into());
        self
    }

    pub fn render_scale(mut self, scale: f32) -> Self {
        self.config.render_scale = scale;
        self
    }

    pub fn ocr_failure_policy(mut self, policy: OcrFailurePolicy) -> Self {
        self.config.ocr_failure_policy = policy;
        self
    }

    pub fn ocr_timeout_secs(mut self, secs: u64) -> Self {
        self.config.ocr_timeout_secs = Some(secs);
        self
    }

    pub fn ocr_engine(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.config.ocr_engine = Some(engine);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.config.classifier = Some(classifier);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, AbstractError> {
        let c = &self.config;
        if c.word_cap == 0 {
            return Err(AbstractError::InvalidConfig(
                "Word cap must be ≥ 1".into(),
            ));
        }
        if !(0.5..=4.0).contains(&c.render_scale) {
            return Err(AbstractError::InvalidConfig(format!(
                "Render scale must be 0.5–4.0, got {}",
                c.render_scale
            )));
        }
        if c.ocr_language.trim().is_empty() {
            return Err(AbstractError::InvalidConfig(
                "OCR language must not be empty".into(),
            ));
        }
        if let Some(ref cls) = c.classifier {
            if !(0.0..=1.0).contains(&cls.min_confidence) {
                return Err(AbstractError::InvalidConfig(format!(
                    "Classifier confidence floor must be 0.0–1.0, got {}",
                    cls.min_confidence
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the OCR fallback reacts when one page cannot be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OcrFailurePolicy {
    /// Fail the whole document. (default)
    #[default]
    Abort,
    /// Log the failure and continue; the page contributes no text.
    SkipPage,
}

/// Settings for the remote classification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Endpoint receiving `{"text": "..."}` as JSON.
    pub endpoint: String,
    /// Predictions below this probability (0–1) are dropped. Default: 0.15.
    pub min_confidence: f64,
    /// Request timeout in seconds. Default: 30.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CLASSIFIER_ENDPOINT.to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = ExtractionConfig::default();
        assert_eq!(c.quality_threshold, 500);
        assert_eq!(c.word_cap, 300);
        assert_eq!(c.ocr_language, "eng");
        assert!(c.ocr_enabled);
        assert_eq!(c.ocr_failure_policy, OcrFailurePolicy::Abort);
        assert!(c.classifier.is_none());
    }

    #[test]
    fn zero_word_cap_rejected() {
        let err = ExtractionConfig::builder().word_cap(0).build().unwrap_err();
        assert!(matches!(err, AbstractError::InvalidConfig(_)));
    }

    #[test]
    fn render_scale_out_of_range_rejected() {
        assert!(ExtractionConfig::builder().render_scale(8.0).build().is_err());
        assert!(ExtractionConfig::builder().render_scale(2.0).build().is_ok());
    }

    #[test]
    fn classifier_confidence_validated() {
        let bad = ClassifierConfig {
            min_confidence: 15.0,
            ..ClassifierConfig::default()
        };
        assert!(ExtractionConfig::builder().classifier(bad).build().is_err());
    }

    #[test]
    fn debug_hides_engine() {
        let dbg = format!("{:?}", ExtractionConfig::default());
        assert!(dbg.contains("quality_threshold"));
        assert!(dbg.contains("ocr_engine: None"));
    }
}
