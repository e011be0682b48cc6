//! # docweave
//!
//! Reconstructs structured DOCX documents from positioned PDF text.
//!
//! The conversion is a six-stage pipeline: positioned-text extraction,
//! block composition, structure analysis, style mapping, document-tree
//! construction, and container serialization. Document semantics —
//! headings, paragraphs, lists, tables, run styling — are recovered purely
//! from spatial and typographic cues; the source's authoring structure is
//! never available.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> docweave::Result<()> {
//!     let pdf = std::fs::read("report.pdf")?;
//!     let docx = docweave::convert(&pdf)?;
//!     std::fs::write("report.docx", docx)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Parse**: validate the `%PDF-` signature, reject encrypted input,
//!   extract positioned text elements per page
//! - **Compose**: order elements into reading order, merge them into blocks
//! - **Analyze**: classify headers/lists/tables/footnotes, build the
//!   section hierarchy, infer the document type
//! - **Map styles**: seed the catalog, promote repeated formats, assign
//!   style references
//! - **Build**: produce the abstract output-document tree and numbering
//! - **Package**: serialize a deterministic DOCX container
//!
//! Every stage is a pure, request-scoped transformation; conversions can
//! run concurrently with no shared mutable state.

pub mod analyze;
pub mod build;
pub mod compose;
pub mod detect;
pub mod error;
pub mod model;
pub mod package;
pub mod parser;
pub mod style;

pub use analyze::{AnalyzeOptions, StructureAnalyzer};
pub use build::{BuildOptions, DocumentBuilder};
pub use compose::{BlockComposer, ComposeOptions};
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    AnalyzedContent, DocumentTree, DocumentType, ListStructure, NumberingDefinition,
    SourceDocument, StyleCatalog, TableStructure, TextBlock,
};
pub use package::{DocxPackager, CONTAINER_SIGNATURE};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use style::{StyleMapper, StyleOptions};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag, checked at each stage boundary.
///
/// On cancellation the partial structures of the current conversion are
/// dropped and nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of conversions holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for the whole pipeline, one group per stage.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub parse: ParseOptions,
    pub compose: ComposeOptions,
    pub analyze: AnalyzeOptions,
    pub style: StyleOptions,
    pub build: BuildOptions,
    /// Optional cancellation token, checked between stages
    pub cancel: Option<CancelToken>,
}

/// Convert a PDF byte stream into a DOCX container with default options.
///
/// The returned bytes always begin with the container signature
/// [`CONTAINER_SIGNATURE`] — including the minimal fallback container that
/// stands in when archive assembly fails.
pub fn convert(source: &[u8]) -> Result<Vec<u8>> {
    convert_with_options(source, &ConvertOptions::default())
}

/// Convert with explicit options.
pub fn convert_with_options(source: &[u8], options: &ConvertOptions) -> Result<Vec<u8>> {
    let checkpoint = |stage: &str| -> Result<()> {
        if options.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            log::debug!("conversion cancelled before {stage}");
            return Err(Error::Cancelled);
        }
        Ok(())
    };

    checkpoint("parse")?;
    let parser = PdfParser::from_bytes_with_options(source, options.parse.clone())?;
    let document = parser.parse()?;

    checkpoint("compose")?;
    let blocks = BlockComposer::with_options(options.compose.clone()).compose_document(&document);

    checkpoint("analyze")?;
    let mut analyzed =
        StructureAnalyzer::with_options(options.analyze.clone()).analyze(&document, &blocks);

    checkpoint("style mapping")?;
    let catalog = StyleMapper::with_options(options.style.clone()).map(&mut analyzed);

    checkpoint("build")?;
    let (tree, numberings) =
        DocumentBuilder::with_options(options.build.clone()).build(&analyzed, &document.metadata);

    checkpoint("package")?;
    match DocxPackager::package(&tree, &catalog, &numberings) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            // Callers must never receive a half-written archive: hand back
            // a valid minimal container carrying the failure notice.
            log::warn!("container assembly failed, emitting fallback: {e}");
            DocxPackager::fallback_package(&e.to_string(), &tree.properties.title)
        }
    }
}

/// Convert a PDF file on disk, returning the DOCX bytes.
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let data = std::fs::read(path)?;
    convert(&data)
}

/// Run the pipeline up to structure analysis and return the analyzed
/// content, with style annotations applied.
pub fn analyze_bytes(source: &[u8], options: &ConvertOptions) -> Result<AnalyzedContent> {
    let parser = PdfParser::from_bytes_with_options(source, options.parse.clone())?;
    let document = parser.parse()?;
    let blocks = BlockComposer::with_options(options.compose.clone()).compose_document(&document);
    let mut analyzed =
        StructureAnalyzer::with_options(options.analyze.clone()).analyze(&document, &blocks);
    StyleMapper::with_options(options.style.clone()).map(&mut analyzed);
    Ok(analyzed)
}

/// Builder for configuring conversions.
///
/// # Example
///
/// ```no_run
/// use docweave::Docweave;
///
/// let docx = Docweave::new()
///     .strict()
///     .preserve_original_fonts()
///     .convert(&std::fs::read("report.pdf")?)?;
/// # Ok::<(), docweave::Error>(())
/// ```
pub struct Docweave {
    options: ConvertOptions,
}

impl Docweave {
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
        }
    }

    /// Fail on any page extraction error instead of degrading.
    pub fn strict(mut self) -> Self {
        self.options.parse = self.options.parse.strict();
        self
    }

    /// Disable parallel page extraction.
    pub fn sequential(mut self) -> Self {
        self.options.parse = self.options.parse.sequential();
        self
    }

    /// Keep unmapped source font names instead of substituting the
    /// default family.
    pub fn preserve_original_fonts(mut self) -> Self {
        self.options.style.preserve_original_fonts = true;
        self
    }

    /// Do not force page breaks before level-1 headers.
    pub fn without_page_breaks(mut self) -> Self {
        self.options.build.page_breaks = false;
        self
    }

    /// Override the block grouping tolerance.
    pub fn with_block_tolerance(mut self, tolerance: f32) -> Self {
        self.options.compose.block_tolerance = tolerance;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.options.cancel = Some(token);
        self
    }

    /// Access the assembled options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Run the full conversion.
    pub fn convert(&self, source: &[u8]) -> Result<Vec<u8>> {
        convert_with_options(source, &self.options)
    }

    /// Run the pipeline up to analysis only.
    pub fn analyze(&self, source: &[u8]) -> Result<AnalyzedContent> {
        analyze_bytes(source, &self.options)
    }

    /// Run only the parsing stage.
    pub fn parse(&self, source: &[u8]) -> Result<SourceDocument> {
        let parser = PdfParser::from_bytes_with_options(source, self.options.parse.clone())?;
        parser.parse()
    }
}

impl Default for Docweave {
    fn default() -> Self {
        Self::new()
    }
}
