//! Segmentation behaviour through the public API.

use pdf_abstract::text::remove_illegal_chars;
use pdf_abstract::{segment_abstract, SegmentStrategy, Segmenter};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn numbered_words(prefix: &str, n: usize) -> String {
    (1..=n)
        .map(|i| format!("{prefix}{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

// ── Worked examples ──────────────────────────────────────────────────────────

#[test]
fn anchor_then_keywords() {
    let text = "Title\n\nABSTRACT\nThis paper studies X.\nKeywords: x, y\nIntroduction\n...";
    assert_eq!(segment_abstract(text), "This paper studies X.");
}

#[test]
fn no_anchor_paragraph_before_introduction() {
    let text = "Title Page\n\nThis is the real abstract text.\n\nIntroduction\nBody...";
    assert_eq!(segment_abstract(text), "This is the real abstract text.");
}

// ── Properties ───────────────────────────────────────────────────────────────

#[test]
fn first_anchor_wins() {
    let text = "Front matter\nA B S T R A C T\nfirst span\nKeywords: a\n\
                Abstract\nsecond span\nIntroduction\n";
    let seg = Segmenter::default().segment(text);
    assert_eq!(seg.text, "first span");
    assert_eq!(seg.strategy, SegmentStrategy::AnchorToBoundary);
}

#[test]
fn spaced_anchor_variants_are_recognised() {
    for heading in ["ABSTRACT", "Abstract", "AB STRACT", "a b s t r a c t"] {
        let text = format!("Cover\n{heading}\nThe finding.\nIntroduction\nBody");
        assert_eq!(segment_abstract(&text), "The finding.", "heading {heading:?}");
    }
}

#[test]
fn earliest_boundary_after_anchor_wins() {
    let text = "Abstract\nWe measure things.\nKeywords: a, b\nMore words here.\n\
                Introduction\nBody text.";
    assert_eq!(segment_abstract(text), "We measure things.");
}

#[test]
fn indonesian_headings_bound_the_abstract() {
    let text = "ABSTRAK\nAbstract\nPenelitian ini membahas Y.\nKata Kunci: y, z\n\
                BAB I\nPENDAHULUAN";
    assert_eq!(segment_abstract(text), "Penelitian ini membahas Y.");

    let text = "Abstract\nRingkasan penelitian.\nBAB 1 LATAR BELAKANG\nIsi";
    assert_eq!(segment_abstract(text), "Ringkasan penelitian.");
}

#[test]
fn numbered_introduction_is_a_boundary() {
    let text = "Abstract\nShort summary.\n\n1. Introduction\nBody";
    assert_eq!(segment_abstract(text), "Short summary.");
}

#[test]
fn sentence_starting_with_heading_word_is_not_a_boundary() {
    let text = "Abstract\nBackground noise matters in audio.\nWe fix it.\nIntroduction\nBody";
    assert_eq!(
        segment_abstract(text),
        "Background noise matters in audio.\nWe fix it."
    );
}

#[test]
fn anchor_without_boundary_is_capped() {
    let text = format!("Abstract\n{}", numbered_words("w", 1000));
    let seg = Segmenter::default().segment(&text);
    assert_eq!(seg.strategy, SegmentStrategy::AnchorWordWindow);
    assert_eq!(word_count(&seg.text), 300);
    assert!(seg.text.starts_with("w1 w2 "));
    assert!(seg.text.ends_with(" w300"));
}

#[test]
fn latest_paragraph_before_heading_is_chosen() {
    let text = "First paragraph that is not it.\n\n   \nSecond paragraph is it.\n\
                Spans two lines.\n\nIntroduction\nBody";
    let seg = Segmenter::default().segment(text);
    assert_eq!(seg.strategy, SegmentStrategy::ParagraphBeforeHeading);
    assert_eq!(seg.text, "Second paragraph is it.\nSpans two lines.");
}

#[test]
fn heading_without_paragraph_break_takes_last_words() {
    let text = format!("{}\nIntroduction\nBody", numbered_words("p", 400));
    let seg = Segmenter::default().segment(&text);
    assert_eq!(seg.strategy, SegmentStrategy::WordsBeforeHeading);
    assert_eq!(word_count(&seg.text), 300);
    assert!(seg.text.starts_with("p101 "));
    assert!(seg.text.ends_with(" p400"));
}

#[test]
fn neither_anchor_nor_heading_takes_leading_words() {
    let text = numbered_words("t", 450);
    let seg = Segmenter::default().segment(&text);
    assert_eq!(seg.strategy, SegmentStrategy::LeadingWords);
    assert_eq!(word_count(&seg.text), 300);
    assert!(seg.text.starts_with("t1 t2"));
    assert!(!seg.text.is_empty());
}

#[test]
fn short_text_is_returned_whole() {
    let text = "Only  a\nhandful\tof words";
    assert_eq!(segment_abstract(text), "Only a handful of words");
}

#[test]
fn empty_text_yields_empty_abstract() {
    assert_eq!(segment_abstract(""), "");
    assert_eq!(segment_abstract("   \n\n  "), "");
}

#[test]
fn custom_word_cap_applies_to_every_window() {
    let segmenter = Segmenter::new(5);
    let text = format!("Abstract {}", numbered_words("x", 50));
    assert_eq!(segmenter.segment(&text).text, "x1 x2 x3 x4 x5");

    let text = numbered_words("y", 50);
    assert_eq!(segmenter.segment(&text).text, "y1 y2 y3 y4 y5");
}

#[test]
fn cleaning_is_idempotent_on_mixed_input() {
    let samples = [
        "Abstract\u{0C}\nBody\u{00}text\r\n",
        "\u{7F}\u{1B}[1mTitle\u{1B}[0m",
        "tab\tand\u{0B}vertical tab",
    ];
    for s in samples {
        let once = remove_illegal_chars(s);
        assert_eq!(remove_illegal_chars(&once), once);
    }
}
