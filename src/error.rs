//! Error types and handling for the XFDF merge library

use std::{io, result::Result as StdResult};

use thiserror::Error;

/// Custom result type for parse and merge operations
pub type Result<T> = StdResult<T, Error>;

/// Core error type. Every variant here aborts the current parse or merge;
/// recoverable conditions go through `utils::logging::DiagnosticLog` instead.
#[derive(Error, Debug)]
#[non_exhaustive]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    #[error("Interchange parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Conversion error: {0}")]
    ConversionError(#[from] ConversionError),

    #[error("Target document error: {0}")]
    TargetError(#[from] TargetError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

// -------------------- Sub-Error Categories --------------------

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Document has no root element")]
    MissingRoot,

    #[error("Annotation <{element}> has no page attribute")]
    MissingPage { element: String },

    #[error("Annotation <{element}> has invalid page number {value:?}")]
    InvalidPage { element: String, value: String },
}

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum ConversionError {
    #[error("Rectangle needs 2 or 4 coordinates, got {0}")]
    RectCoordinateCount(usize),

    #[error("Invalid number {0:?}")]
    InvalidNumber(String),

    #[error("Missing required attribute {0:?}")]
    MissingAttribute(&'static str),
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TargetError {
    #[error("Page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: i64, count: u32 },

    #[error("Page {0} could not be located")]
    MissingPage(u32),

    #[error("PDF object error: {0}")]
    Pdf(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::TargetError(TargetError::Pdf(format!("{:?}", err)))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::ParseError(ParseError::Xml(err.to_string()))
    }
}
