//! Paper source interface and arXiv identifier parsing.
//!
//! Fetching metadata and PDF bytes from a remote repository is left to
//! implementations of [`PaperSource`]; this crate only consumes what they
//! return.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::model::Outline;
use crate::parser::OutlineOptions;

static ARXIV_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"arxiv\.org/(?:abs|pdf)/([^?#\s]+)").unwrap());

/// New-style identifier: `2101.00001`, optionally versioned.
static NEW_STYLE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}\.\d{4,5}(?:v\d+)?$").unwrap());

/// Old-style identifier: `hep-th/9901001`, `math.GT/0309136`.
static OLD_STYLE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z\-]*(?:\.[A-Z]{2})?/\d{7}(?:v\d+)?$").unwrap());

/// Metadata and PDF content of one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaperMetadata {
    pub title: String,
    pub abstract_text: String,
    pub pdf_bytes: Vec<u8>,
}

/// A repository that can deliver paper metadata and the PDF binary.
pub trait PaperSource {
    /// Fetch metadata for an identifier such as `2101.00001`.
    fn fetch_metadata(&self, identifier: &str) -> Result<PaperMetadata>;
}

/// Extract an arXiv identifier from a URL or a bare identifier.
///
/// # Example
///
/// ```
/// use paper_outline::source::parse_arxiv_id;
///
/// assert_eq!(parse_arxiv_id("https://arxiv.org/pdf/2101.00001v2.pdf").unwrap(), "2101.00001v2");
/// assert_eq!(parse_arxiv_id("hep-th/9901001").unwrap(), "hep-th/9901001");
/// ```
pub fn parse_arxiv_id(input: &str) -> Result<String> {
    let trimmed = input.trim();

    let candidate = match ARXIV_URL.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(m) => {
            let id = m.as_str().trim_end_matches('/');
            id.strip_suffix(".pdf").unwrap_or(id)
        }
        None => {
            let lower = trimmed.to_ascii_lowercase();
            if lower.starts_with("arxiv:") {
                &trimmed["arxiv:".len()..]
            } else {
                trimmed
            }
        }
    };

    if NEW_STYLE_ID.is_match(candidate) || OLD_STYLE_ID.is_match(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(Error::InvalidIdentifier(input.to_string()))
    }
}

/// Resolve an identifier, fetch the paper and extract its outline.
pub fn extract_from_source(
    source: &dyn PaperSource,
    input: &str,
    options: &OutlineOptions,
) -> Result<Outline> {
    let id = parse_arxiv_id(input)?;
    log::debug!("Fetching paper {}", id);

    let metadata = source.fetch_metadata(&id)?;
    crate::extract_outline_with_options(
        &metadata.pdf_bytes,
        &metadata.title,
        &metadata.abstract_text,
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_abs_url() {
        assert_eq!(
            parse_arxiv_id("https://arxiv.org/abs/1706.03762").unwrap(),
            "1706.03762"
        );
        assert_eq!(
            parse_arxiv_id("http://arxiv.org/abs/1706.03762v5?context=cs").unwrap(),
            "1706.03762v5"
        );
    }

    #[test]
    fn test_parse_pdf_url() {
        assert_eq!(
            parse_arxiv_id("https://arxiv.org/pdf/2101.00001v2.pdf").unwrap(),
            "2101.00001v2"
        );
        assert_eq!(
            parse_arxiv_id("https://arxiv.org/pdf/2101.00001/").unwrap(),
            "2101.00001"
        );
    }

    #[test]
    fn test_parse_old_style() {
        assert_eq!(
            parse_arxiv_id("https://arxiv.org/abs/hep-th/9901001").unwrap(),
            "hep-th/9901001"
        );
        assert_eq!(parse_arxiv_id("math.GT/0309136").unwrap(), "math.GT/0309136");
    }

    #[test]
    fn test_parse_bare_and_prefixed() {
        assert_eq!(parse_arxiv_id(" 2301.12345 ").unwrap(), "2301.12345");
        assert_eq!(parse_arxiv_id("arXiv:2301.12345v1").unwrap(), "2301.12345v1");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "https://example.com/paper.pdf", "not an id", "arxiv.org/abs/"] {
            assert!(
                matches!(parse_arxiv_id(input), Err(Error::InvalidIdentifier(_))),
                "accepted {:?}",
                input
            );
        }
    }

    struct FailingSource;

    impl PaperSource for FailingSource {
        fn fetch_metadata(&self, identifier: &str) -> Result<PaperMetadata> {
            Err(Error::Fetch(format!("{} not reachable", identifier)))
        }
    }

    #[test]
    fn test_fetch_errors_propagate() {
        let result = extract_from_source(
            &FailingSource,
            "https://arxiv.org/abs/2101.00001",
            &OutlineOptions::default(),
        );
        match result {
            Err(Error::Fetch(msg)) => assert!(msg.contains("2101.00001")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_identifier_skips_fetch() {
        let result = extract_from_source(&FailingSource, "bogus", &OutlineOptions::default());
        assert!(matches!(result, Err(Error::InvalidIdentifier(_))));
    }
}
