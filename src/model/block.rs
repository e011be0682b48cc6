//! Composed text-block types.

use serde::{Deserialize, Serialize};

use super::source::TextElement;
use super::style::Alignment;

/// Axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BBox {
    /// Bounding box of a single element.
    pub fn of_element(e: &TextElement) -> Self {
        Self {
            x: e.x,
            y: e.y,
            width: e.width,
            height: e.height,
        }
    }

    /// Grow this box to include an element.
    pub fn include(&mut self, e: &TextElement) {
        let right = self.x.max(e.right());
        let top = (self.y + self.height).max(e.y + e.height);
        self.x = self.x.min(e.x);
        self.y = self.y.min(e.y);
        self.width = right - self.x;
        self.height = top - self.y;
    }
}

/// A run of text with uniform formatting inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub font_size: f32,
    pub font_name: String,
    pub color: String,
}

impl RunSpan {
    fn from_element(e: &TextElement) -> Self {
        Self {
            text: e.text.clone(),
            bold: e.bold,
            italic: e.italic,
            underline: e.underline,
            strike: e.strike,
            font_size: e.font_size,
            font_name: e.font_name.clone(),
            color: e.color.clone(),
        }
    }

    /// Whether an element carries the same formatting as this span.
    fn matches(&self, e: &TextElement) -> bool {
        self.bold == e.bold
            && self.italic == e.italic
            && self.underline == e.underline
            && self.strike == e.strike
            && (self.font_size - e.font_size).abs() < 0.5
            && self.font_name == e.font_name
            && self.color == e.color
    }
}

/// A group of positioned text elements judged to form one logical
/// line/paragraph fragment. Its structural type is unknown until the
/// analyzer classifies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// Constituent elements, in reading order
    pub elements: Vec<TextElement>,

    /// Bounding box of the whole block
    pub bbox: BBox,

    /// Page number (1-indexed)
    pub page: u32,

    /// Running average font size across elements
    pub avg_font_size: f32,

    /// Running average line height across elements
    pub avg_line_height: f32,
}

impl TextBlock {
    /// Start a new block from its first element.
    pub fn from_element(element: TextElement, page: u32) -> Self {
        let bbox = BBox::of_element(&element);
        let avg_font_size = element.font_size;
        let avg_line_height = element.height;
        Self {
            elements: vec![element],
            bbox,
            page,
            avg_font_size,
            avg_line_height,
        }
    }

    /// Add an element, updating the bounding box and running averages.
    pub fn push(&mut self, element: TextElement) {
        self.bbox.include(&element);
        let n = self.elements.len() as f32;
        self.avg_font_size = (self.avg_font_size * n + element.font_size) / (n + 1.0);
        self.avg_line_height = (self.avg_line_height * n + element.height) / (n + 1.0);
        self.elements.push(element);
    }

    /// Baseline Y of the most recently added element.
    pub fn last_y(&self) -> f32 {
        self.elements.last().map(|e| e.y).unwrap_or(0.0)
    }

    /// Combined text of all elements, whitespace-collapsed.
    pub fn text(&self) -> String {
        let joined = self
            .elements
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        collapse_whitespace(&joined)
    }

    /// Check if the block has no visible text.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() || self.text().trim().is_empty()
    }

    /// Whether the majority of the block's characters are bold.
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .elements
            .iter()
            .filter(|e| e.bold)
            .map(|e| e.text.chars().count())
            .sum();
        let total_chars: usize = self.elements.iter().map(|e| e.text.chars().count()).sum();
        total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5
    }

    /// Whether the majority of the block's characters are italic.
    pub fn is_italic(&self) -> bool {
        let italic_chars: usize = self
            .elements
            .iter()
            .filter(|e| e.italic)
            .map(|e| e.text.chars().count())
            .sum();
        let total_chars: usize = self.elements.iter().map(|e| e.text.chars().count()).sum();
        total_chars > 0 && italic_chars as f32 / total_chars as f32 > 0.5
    }

    /// Dominant font name (first element's).
    pub fn font_name(&self) -> &str {
        self.elements
            .first()
            .map(|e| e.font_name.as_str())
            .unwrap_or("")
    }

    /// Fill color of the first element.
    pub fn color(&self) -> &str {
        self.elements
            .first()
            .map(|e| e.color.as_str())
            .unwrap_or("#000000")
    }

    /// Estimate alignment from the block's average X against the page width.
    pub fn alignment(&self, page_width: f32) -> Alignment {
        const CENTER_TOLERANCE: f32 = 50.0;
        const RIGHT_MARGIN: f32 = 100.0;

        if self.elements.is_empty() {
            return Alignment::Left;
        }
        let avg_x =
            self.elements.iter().map(|e| e.x).sum::<f32>() / self.elements.len() as f32;
        let center = page_width / 2.0;

        if (avg_x - center).abs() < CENTER_TOLERANCE {
            Alignment::Center
        } else if avg_x > page_width - RIGHT_MARGIN {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }

    /// Merge contiguous same-format elements into run spans.
    pub fn runs(&self) -> Vec<RunSpan> {
        let mut runs: Vec<RunSpan> = Vec::new();
        for element in &self.elements {
            if element.text.is_empty() {
                continue;
            }
            match runs.last_mut() {
                Some(run) if run.matches(element) => {
                    if !run.text.ends_with(' ') && !element.text.starts_with(' ') {
                        run.text.push(' ');
                    }
                    run.text.push_str(&element.text);
                }
                _ => runs.push(RunSpan::from_element(element)),
            }
        }
        for run in &mut runs {
            run.text = collapse_whitespace(&run.text);
        }
        runs.retain(|r| !r.text.is_empty());
        runs
    }
}

/// Collapse internal whitespace runs into single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_space = true;
    for c in s.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
