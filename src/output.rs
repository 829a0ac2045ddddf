//! Result types produced by the pipeline.

use crate::segment::SegmentStrategy;
use crate::text::CleanedText;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which acquisition path produced the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSource {
    /// The PDF's embedded text layer passed the quality gate.
    TextLayer,
    /// The text layer was too thin and pages were re-read with OCR.
    Ocr,
    /// The text layer was too thin but no OCR engine was available.
    TextLayerUngated,
}

impl fmt::Display for TextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TextSource::TextLayer => "text layer",
            TextSource::Ocr => "OCR",
            TextSource::TextLayerUngated => "text layer (below quality gate, OCR unavailable)",
        };
        f.write_str(s)
    }
}

/// Cleaned document text plus how it was obtained.
#[derive(Debug, Clone)]
pub struct AcquiredText {
    pub text: CleanedText,
    pub source: TextSource,
    pub page_count: usize,
    /// Trimmed character count of the text layer, whichever path won.
    pub text_layer_chars: usize,
    /// OCR pages skipped under `OcrFailurePolicy::SkipPage`.
    pub skipped_pages: Vec<usize>,
}

/// One classifier label that cleared the confidence floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    /// Confidence as a percentage, rounded to two decimals.
    pub score: f64,
}

/// Outcome of processing one document, shaped for JSON responses.
///
/// ```json
/// {"status":"success","abstract":"…","sdg":[{"label":"…","score":42.5}], …}
/// {"status":"error","message":"…"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentReport {
    Success {
        #[serde(rename = "abstract")]
        abstract_text: String,
        /// Absent when no classifier is configured.
        #[serde(skip_serializing_if = "Option::is_none", default)]
        sdg: Option<Vec<Classification>>,
        source: TextSource,
        page_count: usize,
        strategy: SegmentStrategy,
    },
    Error {
        message: String,
    },
}

impl DocumentReport {
    pub fn is_success(&self) -> bool {
        matches!(self, DocumentReport::Success { .. })
    }

    /// The abstract text, if processing succeeded.
    pub fn abstract_text(&self) -> Option<&str> {
        match self {
            DocumentReport::Success { abstract_text, .. } => Some(abstract_text),
            DocumentReport::Error { .. } => None,
        }
    }

    /// True when the abstract came from a text layer that failed the quality
    /// gate because no OCR engine could run. Such documents are usually scans
    /// and the abstract is likely incomplete.
    pub fn is_ungated(&self) -> bool {
        matches!(
            self,
            DocumentReport::Success {
                source: TextSource::TextLayerUngated,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_report_json_shape() {
        let report = DocumentReport::Success {
            abstract_text: "We study X.".into(),
            sdg: Some(vec![Classification {
                label: "Quality Education".into(),
                score: 42.57,
            }]),
            source: TextSource::TextLayer,
            page_count: 3,
            strategy: SegmentStrategy::AnchorToBoundary,
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["abstract"], "We study X.");
        assert_eq!(v["sdg"][0]["label"], "Quality Education");
        assert_eq!(v["source"], "text_layer");
        assert_eq!(v["strategy"], "anchor_to_boundary");
    }

    #[test]
    fn only_ungated_successes_are_flagged() {
        let report = |source: TextSource| DocumentReport::Success {
            abstract_text: "x".into(),
            sdg: None,
            source,
            page_count: 1,
            strategy: SegmentStrategy::LeadingWords,
        };
        assert!(report(TextSource::TextLayerUngated).is_ungated());
        assert!(!report(TextSource::TextLayer).is_ungated());
        assert!(!report(TextSource::Ocr).is_ungated());
        assert!(!DocumentReport::Error {
            message: "boom".into()
        }
        .is_ungated());
    }

    #[test]
    fn sdg_omitted_without_classifier() {
        let report = DocumentReport::Success {
            abstract_text: "x".into(),
            sdg: None,
            source: TextSource::Ocr,
            page_count: 1,
            strategy: SegmentStrategy::LeadingWords,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("sdg"), "got: {json}");
    }

    #[test]
    fn error_report_json_shape() {
        let report = DocumentReport::Error {
            message: "PDF file not found".into(),
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "PDF file not found");
        assert!(!report.is_success());
        assert_eq!(report.abstract_text(), None);
    }
}
