//! List-marker detection and list folding.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ListItem, ListKind, ListMarkerStyle, ListStructure, TextBlock};

use super::AnalyzeOptions;

static NUMBER_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s+").unwrap());
static LETTER_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]\.\s+").unwrap());
static ROMAN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[ivxlcdm]+\.\s+").unwrap());
static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\u{2022}\u{25E6}\u{2219}\u{00B7}\u{2023}\u{2043}]\s*").unwrap());
static DASH_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\s+").unwrap());
static ASTERISK_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\s+").unwrap());

/// Classify the marker style at the start of a text, if any.
///
/// Precedence: number, then single letter, then roman. A single letter that
/// is also a roman numeral ("i.") classifies as Letter; multi-character
/// roman strings ("ii.", "iv.") classify as Roman. Dash and asterisk
/// markers fold into Bullet.
pub fn marker_style(text: &str) -> Option<ListMarkerStyle> {
    if NUMBER_MARKER.is_match(text) {
        return Some(ListMarkerStyle::Number);
    }
    if LETTER_MARKER.is_match(text) {
        return Some(ListMarkerStyle::Letter);
    }
    if ROMAN_MARKER.is_match(text) {
        return Some(ListMarkerStyle::Roman);
    }
    if BULLET_MARKER.is_match(text) || DASH_MARKER.is_match(text) || ASTERISK_MARKER.is_match(text)
    {
        return Some(ListMarkerStyle::Bullet);
    }
    None
}

/// List kind implied by a marker style.
pub fn kind_for_style(style: ListMarkerStyle) -> ListKind {
    if style.is_ordered() {
        ListKind::Ordered
    } else {
        ListKind::Unordered
    }
}

/// Strip the leading marker from an item text.
pub fn strip_marker(text: &str) -> String {
    for pattern in [
        &*NUMBER_MARKER,
        &*LETTER_MARKER,
        &*ROMAN_MARKER,
        &*BULLET_MARKER,
        &*DASH_MARKER,
        &*ASTERISK_MARKER,
    ] {
        if pattern.is_match(text) {
            return pattern.replace(text, "").trim().to_string();
        }
    }
    text.trim().to_string()
}

/// Nesting level from left-edge indentation.
pub fn indent_level(x: f32, options: &AnalyzeOptions) -> u8 {
    let level = ((x - options.list_base_indent) / options.list_indent_step).floor();
    level.max(0.0).min(8.0) as u8
}

/// Incremental state of the list currently being folded.
///
/// Explicit accumulator value, threaded through the analyzer's scan, so the
/// fold stays pure and testable.
#[derive(Debug, Default)]
pub struct ListAccumulator {
    current: Option<ListStructure>,
}

impl ListAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a list is currently open.
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Feed a marker-bearing block. Returns a completed list when the
    /// marker style changes and the previous list closes.
    pub fn push_item(
        &mut self,
        block: &TextBlock,
        style: ListMarkerStyle,
        options: &AnalyzeOptions,
    ) -> Option<ListStructure> {
        let mut completed = None;

        let style_changed = self
            .current
            .as_ref()
            .map(|l| l.style != style)
            .unwrap_or(false);
        if style_changed {
            completed = self.current.take();
        }

        let list = self
            .current
            .get_or_insert_with(|| ListStructure::new(kind_for_style(style), style));

        let text = strip_marker(&block.text());
        let level = indent_level(block.bbox.x, options);
        let mut item = ListItem::new(text, level);
        item.runs = block.runs();
        if let Some(first) = item.runs.first_mut() {
            first.text = strip_marker(&first.text);
        }
        item.runs.retain(|r| !r.text.is_empty());

        if level > 0 && !list.items.is_empty() {
            // Nested item: attach to the preceding sibling.
            item.level = level;
            let parent = list.items.last_mut().unwrap();
            parent.sub_items.push(item);
        } else {
            item.level = 0;
            list.items.push(item);
        }

        completed
    }

    /// Feed an indented non-list paragraph: continues the last item's text.
    /// Returns false when no list is open or nothing could be appended.
    pub fn continue_item(&mut self, text: &str) -> bool {
        let Some(list) = self.current.as_mut() else {
            return false;
        };
        let Some(last) = list.items.last_mut() else {
            return false;
        };
        let target = if last.sub_items.is_empty() {
            last
        } else {
            last.sub_items.last_mut().unwrap()
        };
        target.text.push(' ');
        target.text.push_str(text.trim());
        if let Some(run) = target.runs.last_mut() {
            run.text.push(' ');
            run.text.push_str(text.trim());
        }
        true
    }

    /// Close and return the current list, if any.
    pub fn finish(&mut self) -> Option<ListStructure> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextElement;

    fn block_at(text: &str, x: f32) -> TextBlock {
        TextBlock::from_element(
            TextElement::new(text.to_string(), x, 700.0, 12.0, "Helvetica".to_string()),
            1,
        )
    }

    #[test]
    fn test_marker_styles() {
        assert_eq!(marker_style("1. First"), Some(ListMarkerStyle::Number));
        assert_eq!(marker_style("12. Twelfth"), Some(ListMarkerStyle::Number));
        assert_eq!(marker_style("a. Alpha"), Some(ListMarkerStyle::Letter));
        assert_eq!(marker_style("i. Single"), Some(ListMarkerStyle::Letter));
        assert_eq!(marker_style("ii. Second"), Some(ListMarkerStyle::Roman));
        assert_eq!(marker_style("iv. Fourth"), Some(ListMarkerStyle::Roman));
        assert_eq!(marker_style("\u{2022} Bullet"), Some(ListMarkerStyle::Bullet));
        assert_eq!(marker_style("- Dash"), Some(ListMarkerStyle::Bullet));
        assert_eq!(marker_style("* Star"), Some(ListMarkerStyle::Bullet));
        assert_eq!(marker_style("Plain text"), None);
        assert_eq!(marker_style("3.14 is pi"), None);
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("1. First item"), "First item");
        assert_eq!(strip_marker("\u{2022} Bulleted"), "Bulleted");
        assert_eq!(strip_marker("- Dashed"), "Dashed");
        assert_eq!(strip_marker("no marker"), "no marker");
    }

    #[test]
    fn test_indent_levels() {
        let options = AnalyzeOptions::default();
        assert_eq!(indent_level(50.0, &options), 0);
        assert_eq!(indent_level(74.0, &options), 0);
        assert_eq!(indent_level(75.0, &options), 1);
        assert_eq!(indent_level(100.0, &options), 2);
        assert_eq!(indent_level(10.0, &options), 0);
    }

    #[test]
    fn test_consecutive_same_style_one_list() {
        let options = AnalyzeOptions::default();
        let mut acc = ListAccumulator::new();

        for text in ["\u{2022} one", "\u{2022} two", "\u{2022} three"] {
            let b = block_at(text, 50.0);
            let completed = acc.push_item(&b, marker_style(text).unwrap(), &options);
            assert!(completed.is_none());
        }

        let list = acc.finish().unwrap();
        assert_eq!(list.items.len(), 3);
        assert_eq!(list.kind, ListKind::Unordered);
        assert_eq!(list.items[0].text, "one");
    }

    #[test]
    fn test_style_change_closes_list() {
        let options = AnalyzeOptions::default();
        let mut acc = ListAccumulator::new();

        let b = block_at("\u{2022} bullet", 50.0);
        acc.push_item(&b, ListMarkerStyle::Bullet, &options);

        let b = block_at("1. numbered", 50.0);
        let completed = acc.push_item(&b, ListMarkerStyle::Number, &options);

        let closed = completed.expect("style change should close the bullet list");
        assert_eq!(closed.style, ListMarkerStyle::Bullet);
        assert_eq!(closed.items.len(), 1);

        let open = acc.finish().unwrap();
        assert_eq!(open.style, ListMarkerStyle::Number);
        assert_eq!(open.kind, ListKind::Ordered);
    }

    #[test]
    fn test_indented_items_nest_under_sibling() {
        let options = AnalyzeOptions::default();
        let mut acc = ListAccumulator::new();

        acc.push_item(&block_at("\u{2022} parent", 50.0), ListMarkerStyle::Bullet, &options);
        acc.push_item(&block_at("\u{2022} child", 80.0), ListMarkerStyle::Bullet, &options);
        acc.push_item(&block_at("\u{2022} next", 50.0), ListMarkerStyle::Bullet, &options);

        let list = acc.finish().unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].sub_items.len(), 1);
        assert_eq!(list.items[0].sub_items[0].text, "child");
    }

    #[test]
    fn test_continuation_appends_to_last_item() {
        let options = AnalyzeOptions::default();
        let mut acc = ListAccumulator::new();

        acc.push_item(&block_at("\u{2022} wrapped", 50.0), ListMarkerStyle::Bullet, &options);
        assert!(acc.continue_item("item text continues"));

        let list = acc.finish().unwrap();
        assert_eq!(list.items[0].text, "wrapped item text continues");
    }

    #[test]
    fn test_continue_without_open_list() {
        let mut acc = ListAccumulator::new();
        assert!(!acc.continue_item("orphan"));
    }
}
