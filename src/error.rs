//! Error types for the conversion pipeline.

use std::io;
use thiserror::Error;

/// Result type alias for docweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during PDF-to-DOCX conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is corrupt or not recognizable as PDF.
    #[error("parse error: {0}")]
    Parse(String),

    /// The input is encrypted or otherwise unsupported.
    #[error("unsupported input: {0}")]
    Unsupported(String),

    /// A block could not be classified during structure analysis.
    ///
    /// The pipeline itself never propagates this variant; classification
    /// failures degrade to marked paragraphs. It exists for callers that
    /// drive individual detectors.
    #[error("structure error: {0}")]
    Structure(String),

    /// The output container could not be assembled, and the minimal
    /// fallback container could not be produced either.
    #[error("serialize error: {0}")]
    Serialize(String),

    /// The conversion was cancelled at a stage boundary.
    #[error("conversion cancelled")]
    Cancelled,
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO_ERROR",
            Error::Parse(_) => "PARSE_ERROR",
            Error::Unsupported(_) => "UNSUPPORTED_INPUT",
            Error::Structure(_) => "STRUCTURE_ERROR",
            Error::Serialize(_) => "SERIALIZE_ERROR",
            Error::Cancelled => "CANCELLED",
        }
    }

    /// Whether the error aborts the whole conversion.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Structure(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => {
                Error::Unsupported("document is encrypted".to_string())
            }
            _ => Error::Parse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Serialize(err.to_string())
    }
}
