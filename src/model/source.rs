//! Source-document types produced by the parser.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed source document: pages of positioned text plus metadata.
///
/// Immutable once parsed; later stages only read from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Document metadata (title, author, etc.)
    pub metadata: SourceMetadata,

    /// Pages in document order
    pub pages: Vec<SourcePage>,
}

impl SourceDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: SourceMetadata::default(),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&SourcePage> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Plain text of the whole document, pages separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for SourceDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// A single page of positioned text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePage {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (MediaBox)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Positioned text elements, in content-stream order
    pub elements: Vec<TextElement>,

    /// Image XObject references on this page (placeholder anchors only)
    pub images: Vec<String>,
}

impl SourcePage {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            elements: Vec::new(),
            images: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Check if the page has no text content.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Plain text of the page, elements joined with spaces.
    pub fn plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A positioned text element extracted from a content stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextElement {
    /// The text content
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, PDF bottom-up coordinates)
    pub y: f32,
    /// Estimated width of the text
    pub width: f32,
    /// Line height (approximated from font size)
    pub height: f32,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub bold: bool,
    /// Whether the font appears to be italic
    pub italic: bool,
    /// Underline flag (graphics-drawn underlines are not detected)
    pub underline: bool,
    /// Strikethrough flag (graphics-drawn strikes are not detected)
    pub strike: bool,
    /// Fill color as lowercase hex (e.g., "#000000")
    pub color: String,
}

impl TextElement {
    /// Create a new element, inferring bold/italic from the font name.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: String) -> Self {
        let lower = font_name.to_lowercase();
        let bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let italic = lower.contains("italic") || lower.contains("oblique");

        // No glyph metrics at this point; half an em per character is the
        // same fallback ratio used when laying out span gaps.
        let width = text.chars().count() as f32 * font_size * 0.5;

        Self {
            text,
            x,
            y,
            width,
            height: font_size,
            font_size,
            font_name,
            bold,
            italic,
            underline: false,
            strike: false,
            color: "#000000".to_string(),
        }
    }

    /// Right edge of the element.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Source document metadata from the Info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document reported itself as encrypted
    pub encrypted: bool,
}

impl SourceMetadata {
    /// Create new metadata with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }
}
