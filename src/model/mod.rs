//! Data model for the conversion pipeline.
//!
//! These types form the intermediate representations that flow between the
//! six pipeline stages: positioned source text, composed blocks, analyzed
//! structure, the style catalog, and the abstract output-document tree. All
//! of them are request-scoped and discarded once the container is written.

mod analysis;
mod block;
mod source;
mod style;
mod tree;

pub use analysis::{
    AnalyzedContent, ConversionNote, DocumentType, FootnoteKind, FootnoteRef, HeaderInfo,
    ImageRef, ListItem, ListKind, ListMarkerStyle, ListStructure, NoteKind, ParagraphContent,
    Section, SectionArena, SectionContent, TableStructure,
};
pub use block::{BBox, RunSpan, TextBlock};
pub use source::{SourceDocument, SourceMetadata, SourcePage, TextElement};
pub use style::{
    Alignment, FontProps, ParagraphProps, StyleCatalog, StyleDefinition, StyleKind,
};
pub use tree::{
    DocProperties, DocxElement, DocxParagraph, DocxRun, DocxTable, DocxTableCell, DocxTableRow,
    DocumentTree, NumberFormat, NumberingDefinition, NumberingLevel, SectionProperties,
};
