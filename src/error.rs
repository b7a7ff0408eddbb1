//! Error types for paper-outline library.

use std::io;
use thiserror::Error;

/// Result type alias for paper-outline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The byte stream cannot be parsed as a valid PDF structure.
    #[error("Corrupt PDF document: {0}")]
    CorruptDocument(String),

    /// The PDF header carries a malformed version.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document parsed but has no pages.
    #[error("Document has no pages")]
    EmptyDocument,

    /// Neither the embedded outline nor the heuristic detector found headings.
    #[error("No headings found: no outline available for this document")]
    NoHeadingsFound,

    /// An option is out of range or a config file is malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No paper identifier could be extracted from the input.
    #[error("Invalid paper identifier: {0}")]
    InvalidIdentifier(String),

    /// The paper source failed to deliver metadata or the PDF.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether this error means "the paper has no outline" rather than a failure
    /// to read the document.
    pub fn is_no_outline(&self) -> bool {
        matches!(self, Error::NoHeadingsFound)
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::CorruptDocument(err.to_string()),
        }
    }
}
