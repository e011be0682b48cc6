//! Footnote detection.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{FootnoteKind, TextBlock};

use super::AnalyzeOptions;

static NUMBERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\s+\S").unwrap());
static ASTERISK_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*+\s+\S").unwrap());
static LETTERED_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]\)\s+\S").unwrap());

/// Whether a block looks like a footnote: small text near the page bottom,
/// or a footnote-marker prefix.
pub fn is_footnote(block: &TextBlock, options: &AnalyzeOptions) -> bool {
    let small_font = block.avg_font_size < options.footnote_font_size;
    let near_bottom = block.bbox.y < options.footnote_bottom_margin;
    if small_font && near_bottom {
        return true;
    }

    let text = block.text();
    NUMBERED_MARKER.is_match(&text)
        || ASTERISK_MARKER.is_match(&text)
        || LETTERED_MARKER.is_match(&text)
}

/// Classify the marker kind of a footnote block.
pub fn footnote_kind(text: &str) -> FootnoteKind {
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        FootnoteKind::Numbered
    } else if text.starts_with('*') {
        FootnoteKind::Asterisk
    } else if LETTERED_MARKER.is_match(text) {
        FootnoteKind::Lettered
    } else {
        FootnoteKind::General
    }
}
