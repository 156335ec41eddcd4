//! Error types for conversion runs
//!
//! Only failures that make the source unreadable surface here. Style,
//! override and image anomalies are logged and recovered where they occur.

use thiserror::Error;

/// Errors that abort a conversion run
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Error reading the source file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading the ZIP container
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error parsing one of the XML parts
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The docx reader rejected the document body
    #[error("Failed to parse document: {0}")]
    Docx(String),

    /// Not a Word document, or a structurally broken one
    #[error("{0}")]
    InvalidFormat(String),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Other errors carrying their context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;
