//! Error types for presentation conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, resolving or rendering a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The presentation JSON could not be parsed.
    #[error("Malformed presentation JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The document parsed but violates a model invariant.
    #[error("Invalid presentation: {0}")]
    InvalidDocument(String),

    /// A color literal could not be turned into RGB.
    #[error("Invalid color value: {0:?}")]
    InvalidColor(String),

    /// A run-wide configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML generation or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// Image decoding or encoding failed.
    #[error("Image error: {0}")]
    ImageError(String),

    /// The PDF source could not be read.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// The HTML source could not be interpreted.
    #[error("HTML error: {0}")]
    HtmlError(String),
}
