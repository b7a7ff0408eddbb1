//! Document-level types.

use super::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A loaded PDF: pages with positioned text plus the raw bookmark tree.
///
/// Owned by the extraction request that loaded it and dropped when the
/// outline has been produced; nothing here refers back to the PDF bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// PDF version from the header (e.g., "1.7")
    pub pdf_version: String,

    /// Info dictionary fields
    pub info: DocumentInfo,

    /// Pages in the document, index `i` at position `i`
    pub pages: Vec<Page>,

    /// Bookmarks in outline-tree pre-order
    pub bookmarks: Vec<Bookmark>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by 0-based index.
    pub fn get_page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether the PDF declares an outline with at least one entry.
    pub fn has_bookmarks(&self) -> bool {
        !self.bookmarks.is_empty()
    }

    /// Total number of text spans across all pages.
    pub fn span_count(&self) -> usize {
        self.pages.iter().map(|p| p.text_spans.len()).sum()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Fields from the PDF Info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Creation date
    pub created: Option<DateTime<Utc>>,
}

/// A raw bookmark as stored in the PDF outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Bookmark title as declared by the producer
    pub title: String,

    /// Nesting depth (0 = child of the outline root)
    pub depth: u32,

    /// Destination page (0-based), `None` when the reference did not resolve
    pub target: Option<usize>,
}

impl Bookmark {
    /// Create a new bookmark.
    pub fn new(title: impl Into<String>, depth: u32, target: Option<usize>) -> Self {
        Self {
            title: title.into(),
            depth,
            target,
        }
    }
}
