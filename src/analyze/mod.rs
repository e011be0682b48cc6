//! Stage 3: structure analysis.
//!
//! Classifies composed blocks into headers, lists, tables, footnotes, and
//! plain paragraphs, builds the section hierarchy, infers the document
//! type, and aggregates everything into [`AnalyzedContent`].

mod doc_type;
mod footnotes;
mod headers;
mod lists;
mod tables;

pub use doc_type::detect_document_type;
pub use footnotes::{footnote_kind, is_footnote};
pub use headers::{header_level, is_header};
pub use lists::{indent_level, marker_style, strip_marker, ListAccumulator};
pub use tables::{detect_tables, PageTable, TableDetection};

use std::collections::HashMap;

use crate::model::{
    AnalyzedContent, BBox, ConversionNote, FootnoteRef, HeaderInfo, ImageRef, NoteKind,
    ParagraphContent, SectionContent, SourceDocument, TableStructure, TextBlock,
};

/// Tunable thresholds for structure analysis.
///
/// The defaults are empirically chosen and preserved from observed
/// behavior; treat them as calibration candidates, not ground truth.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Minimum average font size for the header heuristic (pt)
    pub header_font_size: f32,
    /// Text shorter than this classifies as a header
    pub short_header_max_chars: usize,
    /// Font size below which bottom-of-page text is a footnote (pt)
    pub footnote_font_size: f32,
    /// Distance from the page bottom that counts as "near bottom" (pt)
    pub footnote_bottom_margin: f32,
    /// Assumed base left margin for list indentation (pt)
    pub list_base_indent: f32,
    /// Indentation step per list nesting level (pt)
    pub list_indent_step: f32,
    /// Paragraphs indented beyond this continue the open list item (pt)
    pub list_continuation_indent: f32,
    /// Minimum mean column alignment score to accept a table
    pub table_alignment_threshold: f32,
    /// Cell left edges within this distance of the column mean align (pt)
    pub table_column_tolerance: f32,
    /// Y tolerance for grouping elements into one table row (pt)
    pub table_row_tolerance: f32,
    /// Minimum X gap that separates two cells in a row (pt)
    pub table_min_column_gap: f32,
    /// Number of columns considered by the alignment score
    pub table_max_columns: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            header_font_size: 14.0,
            short_header_max_chars: 80,
            footnote_font_size: 10.0,
            footnote_bottom_margin: 100.0,
            list_base_indent: 50.0,
            list_indent_step: 25.0,
            list_continuation_indent: 60.0,
            table_alignment_threshold: 0.7,
            table_column_tolerance: 15.0,
            table_row_tolerance: 10.0,
            table_min_column_gap: 15.0,
            table_max_columns: 5,
        }
    }
}

/// Structure analyzer over an ordered block stream.
pub struct StructureAnalyzer {
    options: AnalyzeOptions,
}

impl StructureAnalyzer {
    pub fn new() -> Self {
        Self {
            options: AnalyzeOptions::default(),
        }
    }

    pub fn with_options(options: AnalyzeOptions) -> Self {
        Self { options }
    }

    /// Analyze the composed blocks of a document.
    pub fn analyze(&self, doc: &SourceDocument, blocks: &[TextBlock]) -> AnalyzedContent {
        let mut content = AnalyzedContent::default();

        let full_text = blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join(" ");
        content.document_type = detect_document_type(&full_text);

        let detection = detect_tables(blocks, &self.options);
        let mut tables_at: HashMap<usize, TableStructure> = detection
            .tables
            .into_iter()
            .map(|t| (t.first_block, t.table))
            .collect();

        let mut scan = Scan {
            content: &mut content,
            stack: Vec::new(),
            list: ListAccumulator::new(),
            options: &self.options,
        };

        let mut cursor = 0usize;
        for page in &doc.pages {
            let start = cursor;
            while cursor < blocks.len() && blocks[cursor].page == page.number {
                cursor += 1;
            }
            let page_range = start..cursor;

            if page_range.is_empty() {
                scan.record_empty_page(page.number);
                continue;
            }

            for idx in page_range.clone() {
                let block = &blocks[idx];
                if detection.consumed.contains(&idx) {
                    if let Some(table) = tables_at.remove(&idx) {
                        scan.push_table(table);
                    }
                    continue;
                }
                scan.classify_block(block, page.width);
            }

            // Image placeholders anchor at the end of their page's content.
            for name in &page.images {
                let caption = find_caption(&blocks[page_range.clone()]);
                scan.push_image(ImageRef {
                    page: page.number,
                    bbox: BBox::default(),
                    name: name.clone(),
                    caption,
                });
            }
        }

        scan.finish();

        content.complexity = complexity_score(&content);
        debug_assert!(content.sections.validate().is_ok());
        log::debug!(
            "analysis: {} sections, {} lists, {} tables, {} footnotes, complexity {}",
            content.sections.len(),
            content.lists.len(),
            content.tables.len(),
            content.footnotes.len(),
            content.complexity
        );
        content
    }
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable scan state threaded through the block fold.
struct Scan<'a> {
    content: &'a mut AnalyzedContent,
    /// Indices of open sections, innermost last
    stack: Vec<usize>,
    list: ListAccumulator,
    options: &'a AnalyzeOptions,
}

impl Scan<'_> {
    /// Classify one block and fold it into the running structure.
    ///
    /// Order matters: marker patterns outrank the header heuristics, or
    /// every short bullet item would classify as a header.
    fn classify_block(&mut self, block: &TextBlock, page_width: f32) {
        let text = block.text();

        if let Some(style) = marker_style(&text) {
            let stripped = strip_marker(&text);
            if stripped.is_empty() {
                self.degrade(block, "list marker with no item text");
                return;
            }
            if let Some(completed) = self.list.push_item(block, style, self.options) {
                self.push_list(completed);
            }
            return;
        }

        let footnote = is_footnote(block, self.options);
        if footnote {
            self.content.footnotes.push(FootnoteRef {
                page: block.page,
                bbox: block.bbox,
                text: text.clone(),
                kind: footnote_kind(&text),
            });
            // Footnote text still flows into the body as a paragraph.
            self.push_paragraph(block, page_width);
            return;
        }

        if is_header(block, self.options) {
            self.push_header(block, &text);
            return;
        }

        self.push_paragraph(block, page_width);
    }

    fn push_header(&mut self, block: &TextBlock, text: &str) {
        self.close_list();

        let level = header_level(block.avg_font_size);

        // Pop open sections at the same or a deeper level.
        while let Some(&top) = self.stack.last() {
            let top_level = self.content.sections.get(top).map(|s| s.level).unwrap_or(0);
            if top_level >= level {
                self.stack.pop();
            } else {
                break;
            }
        }

        let parent = self.stack.last().copied();
        let idx = self
            .content
            .sections
            .push(text.to_string(), level, block.page, parent);
        if parent.is_none() {
            self.content.roots.push(idx);
        }
        self.stack.push(idx);

        if self.content.title.is_none() {
            self.content.title = Some(text.to_string());
        }

        self.content.headers.push(HeaderInfo {
            text: text.to_string(),
            level,
            page: block.page,
            bbox: block.bbox,
        });
    }

    fn push_paragraph(&mut self, block: &TextBlock, page_width: f32) {
        // An indented paragraph continues the open list item; anything
        // un-indented ends the list.
        if self.list.is_open() {
            if block.bbox.x > self.options.list_continuation_indent {
                if self.list.continue_item(&block.text()) {
                    return;
                }
            } else {
                self.close_list();
            }
        }

        let paragraph = ParagraphContent {
            text: block.text(),
            runs: block.runs(),
            page: block.page,
            bbox: block.bbox,
            font_size: block.avg_font_size,
            font_name: block.font_name().to_string(),
            bold: block.is_bold(),
            italic: block.is_italic(),
            underline: false,
            alignment: block.alignment(page_width),
            style: None,
        };
        self.content.paragraphs.push(paragraph.clone());
        self.attach(SectionContent::Paragraph(paragraph), Some(block.page));
    }

    fn push_table(&mut self, table: TableStructure) {
        self.close_list();
        let page = table.page;
        self.content.tables.push(table.clone());
        self.attach(SectionContent::Table(table), Some(page));
    }

    fn push_list(&mut self, list: crate::model::ListStructure) {
        self.content.lists.push(list.clone());
        self.attach(SectionContent::List(list), None);
    }

    fn push_image(&mut self, image: ImageRef) {
        let page = image.page;
        self.content.images.push(image.clone());
        self.attach(SectionContent::Image(image), Some(page));
    }

    fn record_empty_page(&mut self, page: u32) {
        let message = format!("page {page} contained no extractable text");
        self.content.notes.push(ConversionNote {
            kind: NoteKind::PartialExtraction,
            page: Some(page),
            message: message.clone(),
        });
        self.attach(SectionContent::Note(message), Some(page));
    }

    fn degrade(&mut self, block: &TextBlock, reason: &str) {
        let message = format!("unclassified content on page {}: {reason}", block.page);
        self.content.notes.push(ConversionNote {
            kind: NoteKind::StructureDegraded,
            page: Some(block.page),
            message: message.clone(),
        });
        self.attach(SectionContent::Note(message), Some(block.page));
    }

    fn close_list(&mut self) {
        if let Some(list) = self.list.finish() {
            self.push_list(list);
        }
    }

    /// Attach a content item to the innermost open section, or to the
    /// preamble when no section is open. Open sections extend their page
    /// range as content arrives.
    fn attach(&mut self, item: SectionContent, page: Option<u32>) {
        if let Some(page) = page {
            for &idx in &self.stack {
                if let Some(section) = self.content.sections.get_mut(idx) {
                    section.end_page = section.end_page.max(page);
                }
            }
        }
        match self.stack.last() {
            Some(&top) => {
                if let Some(section) = self.content.sections.get_mut(top) {
                    section.content.push(item);
                }
            }
            None => self.content.preamble.push(item),
        }
    }

    /// Flush the trailing open list at end of document.
    fn finish(&mut self) {
        self.close_list();
    }
}

/// Look for a caption-like block on a page.
fn find_caption(page_blocks: &[TextBlock]) -> Option<String> {
    const CAPTION_KEYWORDS: [&str; 5] = ["figure", "fig.", "image", "photo", "diagram"];

    page_blocks.iter().find_map(|b| {
        let text = b.text();
        let lower = text.to_lowercase();
        if CAPTION_KEYWORDS.iter().any(|k| lower.starts_with(k)) {
            Some(text)
        } else {
            None
        }
    })
}

/// Weighted, bounded 0-100 complexity score.
fn complexity_score(content: &AnalyzedContent) -> u8 {
    let score = content.sections.len() * 2
        + content.lists.len()
        + content.tables.len() * 3
        + content.images.len() * 2
        + content.footnotes.len()
        + content.max_header_level() as usize * 2;
    score.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentType, SourcePage, TextElement};

    fn elem(text: &str, x: f32, y: f32, size: f32, font: &str) -> TextElement {
        TextElement::new(text.to_string(), x, y, size, font.to_string())
    }

    fn block(text: &str, x: f32, y: f32, size: f32, font: &str, page: u32) -> TextBlock {
        TextBlock::from_element(elem(text, x, y, size, font), page)
    }

    fn doc_with_pages(n: u32) -> SourceDocument {
        let mut doc = SourceDocument::new();
        for i in 1..=n {
            doc.pages.push(SourcePage::letter(i));
        }
        doc
    }

    const LONG_BODY: &str = "This sentence is deliberately padded so that its length \
        comfortably exceeds the eighty character header cutoff used by the analyzer.";

    #[test]
    fn test_scenario_title_paragraphs_and_bullets() {
        // Page 1: a 20pt bold title and three 12pt paragraphs.
        // Page 2: a three-item bulleted list.
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(2);
        let blocks = vec![
            block("Title", 50.0, 720.0, 20.0, "Helvetica-Bold", 1),
            block(LONG_BODY, 50.0, 650.0, 12.0, "Helvetica", 1),
            block(LONG_BODY, 50.0, 580.0, 12.0, "Helvetica", 1),
            block(LONG_BODY, 50.0, 510.0, 12.0, "Helvetica", 1),
            block("\u{2022} First item", 50.0, 700.0, 12.0, "Helvetica", 2),
            block("\u{2022} Second item", 50.0, 650.0, 12.0, "Helvetica", 2),
            block("\u{2022} Third item", 50.0, 600.0, 12.0, "Helvetica", 2),
        ];

        let content = analyzer.analyze(&doc, &blocks);

        assert_eq!(content.headers.len(), 1);
        assert_eq!(content.headers[0].level, 1);
        assert_eq!(content.headers[0].text, "Title");
        assert_eq!(content.sections.len(), 1);
        assert_eq!(content.title.as_deref(), Some("Title"));

        let section = content.sections.get(0).unwrap();
        let paragraphs = section
            .content
            .iter()
            .filter(|c| matches!(c, SectionContent::Paragraph(_)))
            .count();
        assert_eq!(paragraphs, 3);

        assert_eq!(content.lists.len(), 1);
        assert_eq!(content.lists[0].items.len(), 3);
        assert_eq!(content.document_type, DocumentType::General);
    }

    #[test]
    fn test_hierarchy_nesting_and_pops() {
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let blocks = vec![
            block("Chapter One", 50.0, 720.0, 20.0, "Helvetica-Bold", 1),
            block("Subsection A", 50.0, 680.0, 16.0, "Helvetica-Bold", 1),
            block("Subsection B", 50.0, 640.0, 16.0, "Helvetica-Bold", 1),
            block("Chapter Two", 50.0, 600.0, 20.0, "Helvetica-Bold", 1),
        ];

        let content = analyzer.analyze(&doc, &blocks);
        assert_eq!(content.sections.len(), 4);
        assert_eq!(content.roots.len(), 2);

        // Level-3 headers nest under the preceding level-1 header.
        assert!(content.sections.is_descendant_of(1, 0));
        assert!(content.sections.is_descendant_of(2, 0));
        // Subsection B pops Subsection A, not Chapter One.
        assert_eq!(content.sections.get(2).unwrap().parent, Some(0));
        // Chapter Two pops everything.
        assert_eq!(content.sections.get(3).unwrap().parent, None);
        assert!(content.sections.validate().is_ok());
    }

    #[test]
    fn test_header_ordering_invariant() {
        // For headers A before B with B.level > A.level, B descends from A.
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let blocks = vec![
            block("Top", 50.0, 720.0, 20.0, "Helvetica-Bold", 1),
            block("Middle", 50.0, 680.0, 18.0, "Helvetica-Bold", 1),
            block("Deep", 50.0, 640.0, 14.0, "Helvetica-Bold", 1),
        ];

        let content = analyzer.analyze(&doc, &blocks);
        assert!(content.sections.is_descendant_of(2, 1));
        assert!(content.sections.is_descendant_of(2, 0));
        assert!(content.sections.is_descendant_of(1, 0));
    }

    #[test]
    fn test_list_continuity() {
        // N consecutive same-style bullet blocks yield one list with N items.
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let blocks: Vec<TextBlock> = (0..5)
            .map(|i| {
                block(
                    &format!("\u{2022} item {i}"),
                    50.0,
                    700.0 - i as f32 * 50.0,
                    12.0,
                    "Helvetica",
                    1,
                )
            })
            .collect();

        let content = analyzer.analyze(&doc, &blocks);
        assert_eq!(content.lists.len(), 1);
        assert_eq!(content.lists[0].items.len(), 5);
    }

    #[test]
    fn test_intervening_block_splits_lists() {
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let blocks = vec![
            block("\u{2022} one", 50.0, 700.0, 12.0, "Helvetica", 1),
            block(LONG_BODY, 50.0, 650.0, 12.0, "Helvetica", 1),
            block("\u{2022} two", 50.0, 600.0, 12.0, "Helvetica", 1),
        ];

        let content = analyzer.analyze(&doc, &blocks);
        assert_eq!(content.lists.len(), 2);
        assert_eq!(content.lists[0].items.len(), 1);
        assert_eq!(content.lists[1].items.len(), 1);
    }

    #[test]
    fn test_empty_page_records_partial_extraction() {
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(2);
        let blocks = vec![block(LONG_BODY, 50.0, 700.0, 12.0, "Helvetica", 2)];

        let content = analyzer.analyze(&doc, &blocks);
        assert_eq!(content.notes.len(), 1);
        assert_eq!(content.notes[0].kind, NoteKind::PartialExtraction);
        assert_eq!(content.notes[0].page, Some(1));
        assert!(matches!(content.preamble[0], SectionContent::Note(_)));
    }

    #[test]
    fn test_marker_without_text_degrades() {
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let blocks = vec![block("\u{2022}", 50.0, 700.0, 12.0, "Helvetica", 1)];

        let content = analyzer.analyze(&doc, &blocks);
        assert_eq!(content.notes.len(), 1);
        assert_eq!(content.notes[0].kind, NoteKind::StructureDegraded);
        assert!(content.lists.is_empty());
    }

    #[test]
    fn test_footnote_recorded_and_kept_as_paragraph() {
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let blocks = vec![
            block(LONG_BODY, 50.0, 700.0, 12.0, "Helvetica", 1),
            block("1 Source: annual report", 50.0, 60.0, 8.0, "Helvetica", 1),
        ];

        let content = analyzer.analyze(&doc, &blocks);
        assert_eq!(content.footnotes.len(), 1);
        assert_eq!(content.paragraphs.len(), 2);
    }

    #[test]
    fn test_complexity_is_bounded() {
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let mut blocks = Vec::new();
        for i in 0..60 {
            blocks.push(block(
                &format!("Heading {i}"),
                50.0,
                700.0 - i as f32 * 10.0,
                20.0,
                "Helvetica-Bold",
                1,
            ));
        }

        let content = analyzer.analyze(&doc, &blocks);
        assert!(content.complexity <= 100);
        assert_eq!(content.complexity, 100);
    }

    #[test]
    fn test_preamble_content_before_first_header() {
        let analyzer = StructureAnalyzer::new();
        let doc = doc_with_pages(1);
        let blocks = vec![
            block(LONG_BODY, 50.0, 720.0, 12.0, "Helvetica", 1),
            block("Heading", 50.0, 650.0, 20.0, "Helvetica-Bold", 1),
            block(LONG_BODY, 50.0, 600.0, 12.0, "Helvetica", 1),
        ];

        let content = analyzer.analyze(&doc, &blocks);
        assert_eq!(content.preamble.len(), 1);
        assert_eq!(content.sections.get(0).unwrap().content.len(), 1);
    }
}
