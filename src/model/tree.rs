//! Abstract output-document tree and numbering definitions.
//!
//! The tree is format-agnostic: it knows about paragraphs, runs, tables, and
//! numbering references, but nothing about XML or ZIP layout. The package
//! serializer owns that mapping.

use serde::{Deserialize, Serialize};

use super::style::Alignment;

/// Document properties carried into the core/app metadata parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocProperties {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub application: String,
    /// W3CDTF creation stamp, taken from source metadata (never "now")
    pub created: Option<String>,
    /// W3CDTF modification stamp, taken from source metadata
    pub modified: Option<String>,
}

impl Default for DocProperties {
    fn default() -> Self {
        Self {
            title: "Converted Document".to_string(),
            author: "docweave".to_string(),
            subject: String::new(),
            keywords: String::new(),
            application: "docweave".to_string(),
            created: None,
            modified: None,
        }
    }
}

/// Page geometry for the single output section. Values are in twips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionProperties {
    pub page_width: u32,
    pub page_height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
}

impl Default for SectionProperties {
    fn default() -> Self {
        // US Letter with one-inch margins.
        Self {
            page_width: 12240,
            page_height: 15840,
            margin_top: 1440,
            margin_right: 1440,
            margin_bottom: 1440,
            margin_left: 1440,
        }
    }
}

/// A run of text with uniform direct formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Font size in points; None inherits from the style
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    /// Hex color without '#'; None inherits
    pub color: Option<String>,
}

impl DocxRun {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A paragraph in the output tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocxParagraph {
    /// Style name reference into the catalog
    pub style: Option<String>,
    /// Numbering reference: (numbering id, indent level)
    pub numbering: Option<(u32, u8)>,
    pub alignment: Option<Alignment>,
    pub page_break_before: bool,
    pub runs: Vec<DocxRun>,
}

impl DocxParagraph {
    /// Create a paragraph with a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![DocxRun::text(text)],
            ..Default::default()
        }
    }

    /// Create a styled paragraph with a single plain run.
    pub fn styled(style: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            style: Some(style.into()),
            runs: vec![DocxRun::text(text)],
            ..Default::default()
        }
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A table cell holding a single paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocxTableCell {
    pub paragraph: DocxParagraph,
}

/// A table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocxTableRow {
    pub cells: Vec<DocxTableCell>,
    pub is_header: bool,
}

/// A table in the output tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocxTable {
    /// Style name reference into the catalog
    pub style: String,
    pub rows: Vec<DocxTableRow>,
}

/// An ordered body element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocxElement {
    Paragraph(DocxParagraph),
    Table(DocxTable),
}

/// Number format of a list level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormat {
    Decimal,
    LowerLetter,
    LowerRoman,
    Bullet,
}

impl NumberFormat {
    /// WordprocessingML `w:numFmt` value.
    pub fn wml_value(self) -> &'static str {
        match self {
            NumberFormat::Decimal => "decimal",
            NumberFormat::LowerLetter => "lowerLetter",
            NumberFormat::LowerRoman => "lowerRoman",
            NumberFormat::Bullet => "bullet",
        }
    }
}

/// One indent level of a numbering definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberingLevel {
    /// 0-based level
    pub level: u8,
    pub format: NumberFormat,
    /// Marker text, e.g. "%1." or a bullet glyph
    pub marker_text: String,
    /// Left indent, twips
    pub indent_left: u32,
    /// Hanging indent, twips
    pub indent_hanging: u32,
    pub font_family: String,
    /// Font size in half-points
    pub font_half_size: u32,
}

/// Abstract + instance numbering pair for one list style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberingDefinition {
    pub numbering_id: u32,
    pub abstract_id: u32,
    pub levels: Vec<NumberingLevel>,
}

/// The complete abstract output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    pub properties: DocProperties,
    pub section: SectionProperties,
    /// Body elements in output order
    pub body: Vec<DocxElement>,
}

impl DocumentTree {
    pub fn new(properties: DocProperties) -> Self {
        Self {
            properties,
            section: SectionProperties::default(),
            body: Vec::new(),
        }
    }

    pub fn push_paragraph(&mut self, paragraph: DocxParagraph) {
        self.body.push(DocxElement::Paragraph(paragraph));
    }

    pub fn push_table(&mut self, table: DocxTable) {
        self.body.push(DocxElement::Table(table));
    }

    /// Every numbering id referenced by body paragraphs.
    pub fn referenced_numbering_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .body
            .iter()
            .filter_map(|e| match e {
                DocxElement::Paragraph(p) => p.numbering.map(|(id, _)| id),
                DocxElement::Table(_) => None,
            })
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Every style name referenced by body elements.
    pub fn referenced_styles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for element in &self.body {
            match element {
                DocxElement::Paragraph(p) => {
                    if let Some(s) = &p.style {
                        names.push(s.as_str());
                    }
                }
                DocxElement::Table(t) => {
                    names.push(t.style.as_str());
                    for row in &t.rows {
                        for cell in &row.cells {
                            if let Some(s) = &cell.paragraph.style {
                                names.push(s.as_str());
                            }
                        }
                    }
                }
            }
        }
        names.sort_unstable();
        names.dedup();
        names
    }
}
