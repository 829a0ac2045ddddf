//! Abstract segmentation: locate the abstract inside a document's full text.
//!
//! Papers arrive with every formatting convention imaginable: `ABSTRACT` in
//! spaced capitals, Indonesian section names, no abstract heading at all. No
//! single rule finds the abstract reliably, so segmentation is an ordered
//! chain of [`SegmentStrategy`]s. Each strategy is a pure function of the
//! text and the anchor position, and returns `None` when its precondition
//! does not hold; the first strategy that returns `Some` wins.
//!
//! | # | Strategy | Needs | Returns |
//! |---|----------|-------|---------|
//! | 1 | `AnchorToBoundary`       | anchor + boundary after it | text between them, trimmed |
//! | 2 | `AnchorWordWindow`       | anchor                     | first N words after it |
//! | 3 | `ParagraphBeforeHeading` | boundary + blank line before it | last paragraph before it |
//! | 4 | `WordsBeforeHeading`     | boundary                   | last N words before it |
//! | 5 | `LeadingWords`           | nothing                    | first N words of the text |
//!
//! Because strategy 2 always succeeds once an anchor exists, strategies 3–5
//! only ever run on documents without an `Abstract` heading.

use crate::config::DEFAULT_WORD_CAP;
use crate::text::{first_words, last_words};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use tracing::debug;

// ── Patterns ─────────────────────────────────────────────────────────────────

/// `Abstract` as a heading: the first word on its line, tolerating spaces
/// between letters (`A B S T R A C T`) that PDF extraction inserts with
/// letter-spaced fonts. The word inside running text is not an anchor.
static RE_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[\ \t]*A\s*B\s*S\s*T\s*R\s*A\s*C\s*T\b").unwrap()
});

/// A line consisting of a section heading that follows the abstract.
///
/// Three shapes are recognised, each on a line of its own:
/// - keyword lines, which may carry the keyword list on the same line
///   (`Keywords: x, y`, `Kata Kunci — a; b`);
/// - named sections with an optional `Chapter`/`Bab` word and `1`/`I`
///   numeral (`Introduction`, `1. Introduction`, `BAB I Latar Belakang`,
///   `Background:`);
/// - bare chapter openers (`Chapter 1`, `Bab 1`, `BAB I`).
///
/// Named sections and chapter openers only allow trailing text after a colon
/// or dash, so body sentences that happen to start with "Background" do not
/// count.
static RE_BOUNDARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?imx)
        ^[\ \t]*
        (?:
            (?:key\s*words?|kata\s*kunci)\b[^\n]*
          | (?:(?:chapter|bab)[\ \t]*)?
            (?:(?:1|i)\.?[\ \t]+)?
            (?:introduction|latar\s*belakang|notation|background)\b
            [\ \t]*(?:[:\-\u{2013}\u{2014}][^\n]*)?
          | (?:chapter|bab)[\ \t]*(?:1|i)\b\.?
            [\ \t]*(?:[:\-\u{2013}\u{2014}][^\n]*)?
        )
        [\ \t\r]*$",
    )
    .unwrap()
});

/// A paragraph break: two line feeds with only whitespace between them.
static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

// ── Strategies ───────────────────────────────────────────────────────────────

/// The fallback chain, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStrategy {
    AnchorToBoundary,
    AnchorWordWindow,
    ParagraphBeforeHeading,
    WordsBeforeHeading,
    LeadingWords,
}

impl SegmentStrategy {
    /// Every strategy, highest priority first.
    pub const CHAIN: [SegmentStrategy; 5] = [
        SegmentStrategy::AnchorToBoundary,
        SegmentStrategy::AnchorWordWindow,
        SegmentStrategy::ParagraphBeforeHeading,
        SegmentStrategy::WordsBeforeHeading,
        SegmentStrategy::LeadingWords,
    ];

    /// Run this strategy alone.
    pub fn apply(self, input: &SegmentInput<'_>) -> Option<String> {
        match self {
            SegmentStrategy::AnchorToBoundary => anchor_to_boundary(input),
            SegmentStrategy::AnchorWordWindow => anchor_word_window(input),
            SegmentStrategy::ParagraphBeforeHeading => paragraph_before_heading(input),
            SegmentStrategy::WordsBeforeHeading => words_before_heading(input),
            SegmentStrategy::LeadingWords => Some(first_words(input.text, input.word_cap)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SegmentStrategy::AnchorToBoundary => "anchor_to_boundary",
            SegmentStrategy::AnchorWordWindow => "anchor_word_window",
            SegmentStrategy::ParagraphBeforeHeading => "paragraph_before_heading",
            SegmentStrategy::WordsBeforeHeading => "words_before_heading",
            SegmentStrategy::LeadingWords => "leading_words",
        }
    }
}

impl fmt::Display for SegmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What every strategy sees: the text, where the anchor is (if anywhere),
/// and the word cap for the windowed fallbacks.
#[derive(Debug, Clone)]
pub struct SegmentInput<'a> {
    pub text: &'a str,
    pub anchor: Option<Range<usize>>,
    pub word_cap: usize,
}

impl<'a> SegmentInput<'a> {
    /// Locate the anchor in `text`.
    pub fn new(text: &'a str, word_cap: usize) -> Self {
        Self {
            text,
            anchor: find_anchor(text),
            word_cap,
        }
    }
}

fn anchor_to_boundary(input: &SegmentInput<'_>) -> Option<String> {
    let start = input.anchor.as_ref()?.end;
    let rest = &input.text[start..];
    let boundary = find_boundary(rest)?;
    Some(rest[..boundary.start].trim().to_string())
}

fn anchor_word_window(input: &SegmentInput<'_>) -> Option<String> {
    let start = input.anchor.as_ref()?.end;
    Some(first_words(&input.text[start..], input.word_cap))
}

fn paragraph_before_heading(input: &SegmentInput<'_>) -> Option<String> {
    let boundary = find_boundary(input.text)?;
    let prefix = input.text[..boundary.start].trim_end();
    let last_break = RE_PARAGRAPH_BREAK.find_iter(prefix).last()?;
    Some(prefix[last_break.end()..].trim().to_string())
}

fn words_before_heading(input: &SegmentInput<'_>) -> Option<String> {
    let boundary = find_boundary(input.text)?;
    Some(last_words(&input.text[..boundary.start], input.word_cap))
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Byte range of the first `Abstract` heading in `text`.
pub fn find_anchor(text: &str) -> Option<Range<usize>> {
    RE_ANCHOR.find(text).map(|m| m.range())
}

/// Byte range of the first boundary-heading line in `text`.
pub fn find_boundary(text: &str) -> Option<Range<usize>> {
    RE_BOUNDARY.find(text).map(|m| m.range())
}

/// A located abstract and the strategy that found it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segmentation {
    pub text: String,
    pub strategy: SegmentStrategy,
}

/// Runs the fallback chain with a configurable word cap.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    word_cap: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self {
            word_cap: DEFAULT_WORD_CAP,
        }
    }
}

impl Segmenter {
    /// A segmenter whose word windows hold at most `word_cap` words
    /// (clamped to at least 1).
    pub fn new(word_cap: usize) -> Self {
        Self {
            word_cap: word_cap.max(1),
        }
    }

    /// Find the abstract. Never fails; the last strategy always applies.
    pub fn segment(&self, text: &str) -> Segmentation {
        let input = SegmentInput::new(text, self.word_cap);
        for strategy in SegmentStrategy::CHAIN {
            if let Some(found) = strategy.apply(&input) {
                debug!(
                    "Abstract located by {} ({} chars)",
                    strategy,
                    found.chars().count()
                );
                return Segmentation {
                    text: found,
                    strategy,
                };
            }
        }
        // LeadingWords always yields, so the chain never falls through.
        Segmentation {
            text: first_words(text, self.word_cap),
            strategy: SegmentStrategy::LeadingWords,
        }
    }
}

/// Return the best-effort abstract of `text` using the default word cap.
pub fn segment_abstract(text: &str) -> String {
    Segmenter::default().segment(text).text
}
