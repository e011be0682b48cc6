//! Stage 2: text block composition.
//!
//! Orders positioned elements into reading order (top-to-bottom,
//! left-to-right; PDF Y coordinates are bottom-up) and merges Y-proximate
//! elements into logical blocks with running font metrics.

use crate::model::{SourceDocument, SourcePage, TextBlock, TextElement};

/// Options for block composition.
///
/// The tolerances are empirically chosen and preserved from observed
/// behavior; override them when calibrating for a new corpus.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Baseline tolerance for grouping elements into one visual line (pt)
    pub line_tolerance: f32,

    /// Y-proximity tolerance for merging lines into one block (pt)
    pub block_tolerance: f32,
}

impl ComposeOptions {
    pub const DEFAULT_LINE_TOLERANCE: f32 = 5.0;
    pub const DEFAULT_BLOCK_TOLERANCE: f32 = 20.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    pub fn with_block_tolerance(mut self, tolerance: f32) -> Self {
        self.block_tolerance = tolerance;
        self
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            line_tolerance: Self::DEFAULT_LINE_TOLERANCE,
            block_tolerance: Self::DEFAULT_BLOCK_TOLERANCE,
        }
    }
}

/// Composes positioned elements into ordered text blocks.
pub struct BlockComposer {
    options: ComposeOptions,
}

impl BlockComposer {
    pub fn new() -> Self {
        Self {
            options: ComposeOptions::default(),
        }
    }

    pub fn with_options(options: ComposeOptions) -> Self {
        Self { options }
    }

    /// Compose all pages of a document. Blocks carry their page number, and
    /// page order is preserved, so the result is in document reading order.
    pub fn compose_document(&self, doc: &SourceDocument) -> Vec<TextBlock> {
        doc.pages
            .iter()
            .flat_map(|page| self.compose_page(page))
            .collect()
    }

    /// Compose one page's elements into ordered blocks.
    pub fn compose_page(&self, page: &SourcePage) -> Vec<TextBlock> {
        let elements: Vec<TextElement> = page
            .elements
            .iter()
            .filter(|e| !e.text.trim().is_empty())
            .cloned()
            .collect();

        if elements.is_empty() {
            return vec![];
        }

        let ordered = self.reading_order(elements);

        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut current: Option<TextBlock> = None;

        for element in ordered {
            match current.as_mut() {
                Some(block)
                    if (block.last_y() - element.y).abs() <= self.options.block_tolerance =>
                {
                    block.push(element);
                }
                _ => {
                    if let Some(block) = current.take() {
                        blocks.push(block);
                    }
                    current = Some(TextBlock::from_element(element, page.number));
                }
            }
        }
        if let Some(block) = current.take() {
            blocks.push(block);
        }

        blocks.retain(|b| !b.is_empty());
        log::debug!(
            "page {}: composed {} blocks from {} elements",
            page.number,
            blocks.len(),
            page.elements.len()
        );
        blocks
    }

    /// Sort elements into reading order: lines by descending Y, elements
    /// within a line by ascending X.
    fn reading_order(&self, mut elements: Vec<TextElement>) -> Vec<TextElement> {
        // Strict total order first; the tolerance pass below restores
        // per-line X ordering for baselines that wobble within tolerance.
        elements.sort_by(|a, b| {
            b.y.partial_cmp(&a.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut lines: Vec<Vec<TextElement>> = Vec::new();
        let mut current_y: Option<f32> = None;

        for element in elements {
            match current_y {
                Some(y) if (element.y - y).abs() <= self.options.line_tolerance => {
                    lines.last_mut().unwrap().push(element);
                }
                _ => {
                    current_y = Some(element.y);
                    lines.push(vec![element]);
                }
            }
        }

        for line in &mut lines {
            line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        }

        lines.into_iter().flatten().collect()
    }
}

impl Default for BlockComposer {
    fn default() -> Self {
        Self::new()
    }
}
