//! # paper-outline
//!
//! Outline extraction for academic paper PDFs.
//!
//! Given the bytes of a paper and the title/abstract reported by its
//! repository, this library produces an ordered heading hierarchy. The
//! PDF's own bookmarks are used when they are trustworthy; otherwise
//! headings are detected from font sizes and section-numbering patterns.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paper_outline::{extract_outline, render};
//!
//! fn main() -> paper_outline::Result<()> {
//!     let bytes = std::fs::read("paper.pdf")?;
//!     let outline = extract_outline(&bytes, "Attention Is All You Need", "")?;
//!
//!     for entry in &outline.entries {
//!         println!("{}", entry);
//!     }
//!
//!     let markdown = render::to_markdown(&outline, &render::RenderOptions::default())?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Embedded bookmarks**: explicit, named and GoTo-action destinations
//! - **Heuristic fallback**: font-size tiers, numbered and roman sections, canonical section names
//! - **Well-formed output**: ordered pages, contiguous indices, no skipped levels
//! - **Parallel processing**: content streams parsed with Rayon
//! - **Multiple output formats**: plain text, Markdown, JSON

pub mod detect;
pub mod error;
pub mod model;
pub mod normalize;
pub mod outline;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    Bookmark, BoundingBox, Document, DocumentInfo, EmbeddedOutlineEntry, HeadingCandidate,
    HeadingSignal, Outline, OutlineEntry, Page, TextSpan,
};
pub use normalize::normalize;
pub use outline::{detect, read_embedded, reconcile, HeadingDetector, Reconciler};
pub use parser::{load, load_file, load_with_options, ErrorMode, OutlineOptions, PageSelection};
pub use render::{JsonFormat, RenderOptions};
pub use source::{extract_from_source, parse_arxiv_id, PaperMetadata, PaperSource};

/// Extract the outline of a paper with default options.
///
/// `raw_title` and `raw_abstract` are the strings reported by the paper's
/// repository; they are cleaned and returned alongside the entries.
///
/// # Errors
///
/// * `CorruptDocument` / `UnsupportedVersion` / `Encrypted` if the bytes cannot be loaded
/// * `EmptyDocument` if the PDF has no pages
/// * `NoHeadingsFound` if neither bookmarks nor heuristics yield a heading
pub fn extract_outline(pdf_bytes: &[u8], raw_title: &str, raw_abstract: &str) -> Result<Outline> {
    extract_outline_with_options(pdf_bytes, raw_title, raw_abstract, &OutlineOptions::default())
}

/// Extract the outline of a paper with custom options.
pub fn extract_outline_with_options(
    pdf_bytes: &[u8],
    raw_title: &str,
    raw_abstract: &str,
    options: &OutlineOptions,
) -> Result<Outline> {
    options.validate()?;
    let document = load_with_options(pdf_bytes, options)?;
    outline_from_document(&document, raw_title, raw_abstract, options)
}

/// Build the outline of an already loaded document.
///
/// A blank `raw_title` falls back to the Info dictionary title, then to the
/// title block detected on the first page.
pub fn outline_from_document(
    document: &Document,
    raw_title: &str,
    raw_abstract: &str,
    options: &OutlineOptions,
) -> Result<Outline> {
    options.validate()?;

    let embedded = read_embedded(document);
    let detection = HeadingDetector::new(options).analyze(document);

    let entries = Reconciler::new(document.page_count())
        .with_max_levels(options.max_levels)
        .reconcile(embedded, detection.candidates)?;

    let (title, abstract_text) = normalize(raw_title, raw_abstract);
    let title = if title.trim().is_empty() {
        document
            .info
            .title
            .as_deref()
            .or(detection.title.as_deref())
            .map(normalize::clean_text)
            .unwrap_or(title)
    } else {
        title
    };

    Ok(Outline::new(title, abstract_text, entries))
}

/// Run the extraction on Tokio's blocking pool.
#[cfg(feature = "async")]
pub async fn extract_outline_async(
    pdf_bytes: Vec<u8>,
    raw_title: String,
    raw_abstract: String,
    options: OutlineOptions,
) -> Result<Outline> {
    tokio::task::spawn_blocking(move || {
        extract_outline_with_options(&pdf_bytes, &raw_title, &raw_abstract, &options)
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(e)))?
}

/// Builder API for outline extraction.
///
/// # Example
///
/// ```no_run
/// use paper_outline::{OutlineExtractor, PageSelection};
///
/// let bytes = std::fs::read("paper.pdf")?;
/// let outline = OutlineExtractor::new()
///     .with_max_levels(3)
///     .with_pages(PageSelection::first(7))
///     .extract(&bytes, "", "")?;
/// println!("{} headings", outline.len());
/// # Ok::<(), paper_outline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: OutlineOptions,
}

impl OutlineExtractor {
    /// Create a new extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options.
    pub fn with_options(mut self, options: OutlineOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the hierarchy depth cap.
    pub fn with_max_levels(mut self, levels: u8) -> Self {
        self.options = self.options.with_max_levels(levels);
        self
    }

    /// Set the font-size ratio margin.
    pub fn with_size_margin(mut self, margin: f32) -> Self {
        self.options = self.options.with_size_margin(margin);
        self
    }

    /// Set the heading length sanity bound.
    pub fn with_max_heading_length(mut self, length: usize) -> Self {
        self.options = self.options.with_max_heading_length(length);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Fail on undecodable page content.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Get the configured options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Extract the outline of a paper.
    pub fn extract(&self, pdf_bytes: &[u8], raw_title: &str, raw_abstract: &str) -> Result<Outline> {
        extract_outline_with_options(pdf_bytes, raw_title, raw_abstract, &self.options)
    }
}
