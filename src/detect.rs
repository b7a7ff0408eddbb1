//! PDF header sniffing and validation.

use crate::error::{Error, Result};

/// PDF format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
    /// Whether the `%%EOF` marker is missing from the tail (partial download)
    pub truncated: bool,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"
const EOF_MARKER: &[u8] = b"%%EOF";
const EOF_SEARCH_WINDOW: usize = 1024;

/// Detect PDF format from bytes.
///
/// # Returns
/// * `Ok(PdfFormat)` if the data starts with a valid PDF header
/// * `Err(Error::CorruptDocument)` if the data is not a PDF at all
/// * `Err(Error::UnsupportedVersion)` if the header version is malformed
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    if data.len() < PDF_MAGIC_LEN + VERSION_LEN {
        return Err(Error::CorruptDocument(format!(
            "{} bytes is too short for a PDF header",
            data.len()
        )));
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(Error::CorruptDocument("missing %PDF- header".to_string()));
    }

    let version_bytes = &data[PDF_MAGIC_LEN..PDF_MAGIC_LEN + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(PdfFormat {
        version,
        truncated: !has_eof_marker(data),
    })
}

/// A version is `<digit>.<digit>`.
fn is_valid_version(version: &str) -> bool {
    matches!(
        version.as_bytes(),
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit()
    )
}

/// Whether `%%EOF` appears near the end of the data.
fn has_eof_marker(data: &[u8]) -> bool {
    let start = data.len().saturating_sub(EOF_SEARCH_WINDOW);
    data[start..]
        .windows(EOF_MARKER.len())
        .any(|w| w == EOF_MARKER)
}

/// Check if bytes carry a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}
