//! Stage 5: abstract document-tree construction.
//!
//! Converts styled analyzed content into a format-agnostic tree of
//! paragraphs, runs, and tables, plus one numbering definition per
//! distinct (list kind, marker style) pair.

use std::collections::HashMap;

use chrono::SecondsFormat;

use crate::model::{
    AnalyzedContent, DocProperties, DocxParagraph, DocxRun, DocxTable, DocxTableCell,
    DocxTableRow, DocumentTree, ImageRef, ListItem, ListKind, ListMarkerStyle, ListStructure,
    NumberFormat, NumberingDefinition, NumberingLevel, ParagraphContent, RunSpan,
    SectionContent, SourceMetadata, TableStructure,
};

/// Bullet glyph rotation across indent levels.
const BULLET_GLYPHS: [&str; 3] = ["\u{2022}", "\u{25E6}", "\u{25AA}"];

/// Options for document-tree construction.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Force a page break before every level-1 section header
    pub page_breaks: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self { page_breaks: true }
    }
}

/// Builds the output-document tree from analyzed content.
pub struct DocumentBuilder {
    options: BuildOptions,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            options: BuildOptions::default(),
        }
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the tree and the numbering definitions it references.
    pub fn build(
        &self,
        content: &AnalyzedContent,
        meta: &SourceMetadata,
    ) -> (DocumentTree, Vec<NumberingDefinition>) {
        let (numberings, numbering_ids) = allocate_numbering(content);

        let mut tree = DocumentTree::new(doc_properties(content, meta));

        for item in &content.preamble {
            self.emit_content(&mut tree, item, &numbering_ids);
        }

        // The arena is in document order, so a flat walk preserves source
        // order; the hierarchy lives in the section links.
        for section in content.sections.iter() {
            let level = section.level.min(6);
            let mut header = DocxParagraph::styled(format!("Heading {level}"), &section.title);
            header.page_break_before = section.level == 1 && self.options.page_breaks;
            tree.push_paragraph(header);

            for item in &section.content {
                self.emit_content(&mut tree, item, &numbering_ids);
            }
        }

        (tree, numberings)
    }

    fn emit_content(
        &self,
        tree: &mut DocumentTree,
        item: &SectionContent,
        numbering_ids: &HashMap<(ListKind, ListMarkerStyle), u32>,
    ) {
        match item {
            SectionContent::Paragraph(p) => {
                tree.push_paragraph(paragraph_from_content(p));
            }
            SectionContent::List(list) => {
                let numbering_id = numbering_ids
                    .get(&(list.kind, list.style))
                    .copied()
                    .unwrap_or(1);
                for item in &list.items {
                    self.emit_list_item(tree, item, numbering_id, 0);
                }
            }
            SectionContent::Table(table) => {
                tree.push_table(table_from_structure(table));
            }
            SectionContent::Image(image) => {
                tree.push_paragraph(image_placeholder(image));
            }
            SectionContent::Note(message) => {
                tree.push_paragraph(note_paragraph(message));
            }
        }
    }

    fn emit_list_item(
        &self,
        tree: &mut DocumentTree,
        item: &ListItem,
        numbering_id: u32,
        level: u8,
    ) {
        let mut paragraph = DocxParagraph {
            style: Some("List Paragraph".to_string()),
            numbering: Some((numbering_id, level.min(8))),
            ..DocxParagraph::default()
        };
        paragraph.runs = if item.runs.is_empty() {
            vec![DocxRun::text(&item.text)]
        } else {
            item.runs.iter().map(run_from_span).collect()
        };
        tree.push_paragraph(paragraph);

        // Sub-items render one indent level deeper than their parent.
        for sub in &item.sub_items {
            self.emit_list_item(tree, sub, numbering_id, level + 1);
        }
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One numbering definition per distinct (kind, style) pair, ids from 1 in
/// first-seen order.
fn allocate_numbering(
    content: &AnalyzedContent,
) -> (
    Vec<NumberingDefinition>,
    HashMap<(ListKind, ListMarkerStyle), u32>,
) {
    let mut ids: HashMap<(ListKind, ListMarkerStyle), u32> = HashMap::new();
    let mut definitions: Vec<NumberingDefinition> = Vec::new();

    for list in &content.lists {
        let key = (list.kind, list.style);
        if ids.contains_key(&key) {
            continue;
        }
        let id = definitions.len() as u32 + 1;
        ids.insert(key, id);
        definitions.push(numbering_definition(id, list));
    }

    (definitions, ids)
}

/// Nine precomputed indent levels with level-appropriate markers.
fn numbering_definition(id: u32, list: &ListStructure) -> NumberingDefinition {
    let levels = (0..9u8)
        .map(|level| {
            let (format, marker_text) = match list.kind {
                ListKind::Ordered => {
                    let format = match list.style {
                        ListMarkerStyle::Letter => NumberFormat::LowerLetter,
                        ListMarkerStyle::Roman => NumberFormat::LowerRoman,
                        _ => NumberFormat::Decimal,
                    };
                    (format, format!("%{}.", level + 1))
                }
                ListKind::Unordered => (
                    NumberFormat::Bullet,
                    BULLET_GLYPHS[level as usize % BULLET_GLYPHS.len()].to_string(),
                ),
            };
            NumberingLevel {
                level,
                format,
                marker_text,
                indent_left: 360 + level as u32 * 360,
                indent_hanging: 360,
                font_family: "Times New Roman".to_string(),
                font_half_size: 24,
            }
        })
        .collect();

    NumberingDefinition {
        numbering_id: id,
        abstract_id: id,
        levels,
    }
}

fn doc_properties(content: &AnalyzedContent, meta: &SourceMetadata) -> DocProperties {
    let mut props = DocProperties::default();
    if let Some(title) = meta.title.clone().or_else(|| content.title.clone()) {
        props.title = title;
    }
    if let Some(author) = meta.author.clone() {
        props.author = author;
    }
    if let Some(subject) = meta.subject.clone() {
        props.subject = subject;
    }
    if let Some(keywords) = meta.keywords.clone() {
        props.keywords = keywords;
    }
    props.application = format!("docweave {}", env!("CARGO_PKG_VERSION"));
    // Timestamps come from the source only; a wall-clock stamp would break
    // byte-identical reruns.
    props.created = meta
        .created
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true));
    props.modified = meta
        .modified
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true));
    props
}

fn paragraph_from_content(p: &ParagraphContent) -> DocxParagraph {
    let mut paragraph = DocxParagraph {
        style: Some(p.style.clone().unwrap_or_else(|| "Normal".to_string())),
        ..DocxParagraph::default()
    };
    if p.alignment != crate::model::Alignment::Left {
        paragraph.alignment = Some(p.alignment);
    }
    paragraph.runs = if p.runs.is_empty() {
        vec![DocxRun::text(&p.text)]
    } else {
        p.runs.iter().map(run_from_span).collect()
    };
    paragraph
}

fn run_from_span(span: &RunSpan) -> DocxRun {
    DocxRun {
        text: span.text.clone(),
        bold: span.bold,
        italic: span.italic,
        underline: span.underline,
        strike: span.strike,
        font_size: Some(span.font_size),
        font_family: Some(span.font_name.clone()),
        color: match span.color.trim_start_matches('#') {
            "000000" => None,
            other => Some(other.to_string()),
        },
    }
}

fn table_from_structure(table: &TableStructure) -> DocxTable {
    DocxTable {
        style: "Table Grid".to_string(),
        rows: table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| DocxTableRow {
                is_header: i == 0 && table.has_header,
                cells: row
                    .iter()
                    .map(|text| DocxTableCell {
                        paragraph: DocxParagraph::with_text(text),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn image_placeholder(image: &ImageRef) -> DocxParagraph {
    let caption = image.caption.as_deref().unwrap_or("Embedded Image");
    DocxParagraph::with_text(format!("[Image: {caption}]"))
}

fn note_paragraph(message: &str) -> DocxParagraph {
    let mut run = DocxRun::text(format!("[{message}]"));
    run.italic = true;
    DocxParagraph {
        style: Some("Normal".to_string()),
        runs: vec![run],
        ..DocxParagraph::default()
    }
}
