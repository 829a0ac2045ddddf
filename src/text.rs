//! Text normalisation shared by every acquisition path.
//!
//! Extracted text is deliberately left almost untouched: the segmentation
//! heuristics rely on the original line breaks, blank lines and casing. The
//! only invariant enforced is that [`CleanedText`] never contains an ASCII
//! control character other than tab, line feed and carriage return.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;

/// Text with illegal control characters removed.
///
/// The only way to build one is [`CleanedText::new`], so every value of this
/// type upholds the invariant regardless of whether it came from the text
/// layer or from OCR.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanedText(String);

impl CleanedText {
    /// Strip illegal control characters from `raw`.
    pub fn new(raw: &str) -> Self {
        Self(remove_illegal_chars(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Character count after trimming surrounding whitespace; the measure
    /// the quality gate compares against its threshold.
    pub fn trimmed_char_count(&self) -> usize {
        self.0.trim().chars().count()
    }
}

impl Deref for CleanedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CleanedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CleanedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CleanedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// U+0000–U+0008, U+000B, U+000C, U+000E–U+001F and U+007F.
fn is_illegal_char(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

/// Remove every illegal control character, keeping tab, LF and CR.
pub fn remove_illegal_chars(input: &str) -> String {
    input.replace(is_illegal_char, "")
}

/// CRLF and lone CR become LF. pdfium reports line breaks as CRLF.
pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// The first `n` whitespace-delimited words, joined by single spaces.
pub fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// The last `n` whitespace-delimited words, joined by single spaces.
pub fn last_words(text: &str, n: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let start = words.len().saturating_sub(n);
    words[start..].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_illegal_range() {
        let input = "a\u{00}b\u{08}c\u{0B}d\u{0C}e\u{0E}f\u{1F}g\u{7F}h";
        assert_eq!(remove_illegal_chars(input), "abcdefgh");
    }

    #[test]
    fn keeps_tab_newline_and_carriage_return() {
        let input = "col1\tcol2\r\nnext line\n";
        assert_eq!(remove_illegal_chars(input), input);
    }

    #[test]
    fn keeps_non_ascii_text() {
        let input = "Abstrak — penelitian ini menggunakan données ÿ \u{80}";
        assert_eq!(remove_illegal_chars(input), input);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let samples = [
            "",
            "plain",
            "\u{00}\u{01}\u{02}",
            "mixed\u{0C}form\u{0B}feed\n\n\u{7F}",
            "\u{1F}\u{1E}\t\u{1D}",
        ];
        for s in samples {
            let once = remove_illegal_chars(s);
            assert_eq!(remove_illegal_chars(&once), once, "input: {s:?}");
        }
    }

    #[test]
    fn cleaned_text_upholds_invariant() {
        let cleaned = CleanedText::new("x\u{03}y\u{1B}[0m");
        assert_eq!(cleaned.as_str(), "xy[0m");
        assert!(!cleaned.chars().any(is_illegal_char));
    }

    #[test]
    fn trimmed_char_count_counts_chars_not_bytes() {
        let cleaned = CleanedText::new("  é è  \n");
        assert_eq!(cleaned.trimmed_char_count(), 3);
    }

    #[test]
    fn test_normalise_line_endings() {
        assert_eq!(normalise_line_endings("a\r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn word_windows() {
        let text = "one  two\nthree\tfour five";
        assert_eq!(first_words(text, 2), "one two");
        assert_eq!(last_words(text, 2), "four five");
        assert_eq!(first_words(text, 100), "one two three four five");
        assert_eq!(last_words(text, 100), "one two three four five");
        assert_eq!(first_words("   ", 5), "");
        assert_eq!(last_words("", 5), "");
    }
}
