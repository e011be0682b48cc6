//! Analyzed-structure types: sections, lists, tables, footnotes, images.

use serde::{Deserialize, Serialize};

use super::block::{BBox, RunSpan};
use super::style::Alignment;

/// Coarse document category inferred from keyword frequencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Academic,
    Business,
    Legal,
    #[default]
    General,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Academic => "academic",
            DocumentType::Business => "business",
            DocumentType::Legal => "legal",
            DocumentType::General => "general",
        }
    }
}

/// A classified header occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderInfo {
    pub text: String,
    /// Level 1-5, smaller is more prominent
    pub level: u8,
    pub page: u32,
    pub bbox: BBox,
}

/// A plain paragraph after classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParagraphContent {
    pub text: String,
    /// Contiguous same-format spans
    pub runs: Vec<RunSpan>,
    pub page: u32,
    pub bbox: BBox,
    pub font_size: f32,
    pub font_name: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub alignment: Alignment,
    /// Style reference, assigned by the style mapper
    pub style: Option<String>,
}

/// Ordered content item inside a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionContent {
    Paragraph(ParagraphContent),
    List(ListStructure),
    Table(TableStructure),
    Image(ImageRef),
    /// Inline marker paragraph from a non-fatal degradation
    Note(String),
}

/// Kind of a detected list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// Marker style of a detected list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMarkerStyle {
    Bullet,
    Number,
    Letter,
    Roman,
}

impl ListMarkerStyle {
    /// Whether markers of this style number their items.
    pub fn is_ordered(self) -> bool {
        !matches!(self, ListMarkerStyle::Bullet)
    }
}

/// A single list item, possibly with nested sub-items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem {
    /// Item text with the marker stripped
    pub text: String,
    /// Nesting level (0 = top)
    pub level: u8,
    /// Formatting spans of the item text
    pub runs: Vec<RunSpan>,
    pub sub_items: Vec<ListItem>,
}

impl ListItem {
    pub fn new(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            level,
            runs: Vec::new(),
            sub_items: Vec::new(),
        }
    }
}

/// A detected list: one structure per run of same-style marker blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListStructure {
    pub kind: ListKind,
    pub style: ListMarkerStyle,
    pub items: Vec<ListItem>,
}

impl ListStructure {
    pub fn new(kind: ListKind, style: ListMarkerStyle) -> Self {
        Self {
            kind,
            style,
            items: Vec::new(),
        }
    }

    /// Total number of items including nested sub-items.
    pub fn total_items(&self) -> usize {
        fn count(items: &[ListItem]) -> usize {
            items.iter().map(|i| 1 + count(&i.sub_items)).sum()
        }
        count(&self.items)
    }
}

/// A detected table as a grid of cell texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStructure {
    /// Rows of cell text, top to bottom
    pub rows: Vec<Vec<String>>,
    pub column_count: usize,
    pub has_header: bool,
    pub bbox: BBox,
    pub page: u32,
}

impl TableStructure {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Footnote marker kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FootnoteKind {
    Numbered,
    Asterisk,
    Lettered,
    General,
}

/// A detected footnote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootnoteRef {
    pub page: u32,
    pub bbox: BBox,
    pub text: String,
    pub kind: FootnoteKind,
}

/// A placeholder reference to an image on a page. True embedding is out of
/// scope; the builder renders these as textual placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub page: u32,
    pub bbox: BBox,
    /// XObject resource name
    pub name: String,
    pub caption: Option<String>,
}

/// A section stored in the arena. Parent/child links are arena indices; the
/// parent link is for lookup only and never an ownership edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Level 1-5, matching the header that opened the section
    pub level: u8,
    pub start_page: u32,
    pub end_page: u32,
    pub content: Vec<SectionContent>,
    /// Child section indices, in document order
    pub subsections: Vec<usize>,
    /// Parent section index
    pub parent: Option<usize>,
}

/// Arena holding all sections in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionArena {
    sections: Vec<Section>,
}

impl SectionArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section and return its index. The section id is derived from
    /// the index, so ids are stable and unique.
    pub fn push(&mut self, title: String, level: u8, page: u32, parent: Option<usize>) -> usize {
        let index = self.sections.len();
        let section = Section {
            id: format!("section-{}", index + 1),
            title,
            level,
            start_page: page,
            end_page: page,
            content: Vec::new(),
            subsections: Vec::new(),
            parent,
        };
        if let Some(p) = parent {
            self.sections[p].subsections.push(index);
        }
        self.sections.push(section);
        index
    }

    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Iterate sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether `ancestor` appears on `index`'s parent chain.
    pub fn is_descendant_of(&self, index: usize, ancestor: usize) -> bool {
        let mut current = self.sections.get(index).and_then(|s| s.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.sections.get(p).and_then(|s| s.parent);
        }
        false
    }

    /// Verify the arena invariants: parents precede children (no cycles)
    /// and a child's level strictly exceeds its parent's.
    pub fn validate(&self) -> Result<(), String> {
        for (i, section) in self.sections.iter().enumerate() {
            if let Some(p) = section.parent {
                if p >= i {
                    return Err(format!("section {i} links to a later parent {p}"));
                }
                let parent_level = self.sections[p].level;
                if section.level <= parent_level {
                    return Err(format!(
                        "section {i} (level {}) is nested under level {}",
                        section.level, parent_level
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Kind of a non-fatal conversion note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    /// A page yielded no extractable text
    PartialExtraction,
    /// A block failed classification and was degraded to a paragraph
    StructureDegraded,
}

impl NoteKind {
    pub fn code(self) -> &'static str {
        match self {
            NoteKind::PartialExtraction => "PARTIAL_EXTRACTION",
            NoteKind::StructureDegraded => "STRUCTURE_ERROR",
        }
    }
}

/// A recorded non-fatal event. These surface only as inline markers in the
/// output document, never as returned errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionNote {
    pub kind: NoteKind,
    pub page: Option<u32>,
    pub message: String,
}

/// Aggregated output of the structure analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzedContent {
    pub document_type: DocumentType,
    /// Detected document title (first prominent block), if any
    pub title: Option<String>,
    pub sections: SectionArena,
    /// Indices of top-level sections
    pub roots: Vec<usize>,
    /// Ordered content that precedes the first header
    pub preamble: Vec<SectionContent>,
    pub headers: Vec<HeaderInfo>,
    /// Flat aggregate of classified paragraphs (for style scanning)
    pub paragraphs: Vec<ParagraphContent>,
    pub lists: Vec<ListStructure>,
    pub tables: Vec<TableStructure>,
    pub images: Vec<ImageRef>,
    pub footnotes: Vec<FootnoteRef>,
    pub notes: Vec<ConversionNote>,
    /// Bounded 0-100 structural complexity score
    pub complexity: u8,
}

impl AnalyzedContent {
    /// Deepest header level observed (0 when there are no headers).
    pub fn max_header_level(&self) -> u8 {
        self.headers.iter().map(|h| h.level).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_parent_child() {
        let mut arena = SectionArena::new();
        let root = arena.push("Chapter".into(), 1, 1, None);
        let child = arena.push("Section".into(), 2, 1, Some(root));
        let grandchild = arena.push("Subsection".into(), 3, 2, Some(child));

        assert_eq!(arena.get(root).unwrap().subsections, vec![child]);
        assert!(arena.is_descendant_of(grandchild, root));
        assert!(arena.is_descendant_of(child, root));
        assert!(!arena.is_descendant_of(root, child));
        assert!(arena.validate().is_ok());
    }

    #[test]
    fn test_arena_validate_rejects_level_inversion() {
        let mut arena = SectionArena::new();
        let root = arena.push("A".into(), 2, 1, None);
        arena.push("B".into(), 2, 1, Some(root));
        assert!(arena.validate().is_err());
    }

    #[test]
    fn test_list_total_items() {
        let mut list = ListStructure::new(ListKind::Unordered, ListMarkerStyle::Bullet);
        let mut first = ListItem::new("first", 0);
        first.sub_items.push(ListItem::new("nested", 1));
        list.items.push(first);
        list.items.push(ListItem::new("second", 0));
        assert_eq!(list.total_items(), 3);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_section_ids_are_stable() {
        let mut arena = SectionArena::new();
        let a = arena.push("A".into(), 1, 1, None);
        let b = arena.push("B".into(), 1, 2, None);
        assert_eq!(arena.get(a).unwrap().id, "section-1");
        assert_eq!(arena.get(b).unwrap().id, "section-2");
    }

    #[test]
    fn test_note_codes() {
        assert_eq!(NoteKind::PartialExtraction.code(), "PARTIAL_EXTRACTION");
        assert_eq!(NoteKind::StructureDegraded.code(), "STRUCTURE_ERROR");
    }
}
