//! Stage 1: positioned-text extraction.

mod content;
mod options;
mod pdf_parser;

pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::PdfParser;
