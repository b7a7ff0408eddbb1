//! Extraction options and configuration.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options for loading a PDF and extracting its outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineOptions {
    /// Cap on hierarchy depth
    pub max_levels: u8,

    /// Minimum font-size ratio over body text for a line to count as a heading
    pub size_margin: f32,

    /// Candidate text longer than this (in characters) is treated as body text
    pub max_heading_length: usize,

    /// Numbered or named sections set smaller than this ratio of body size are ignored
    pub min_pattern_ratio: f32,

    /// Pages whose text is extracted (1-indexed); others load empty
    pub pages: PageSelection,

    /// Error handling mode for undecodable page content
    pub error_mode: ErrorMode,

    /// Whether to extract pages in parallel
    pub parallel: bool,

    /// Whether a lone largest-font block on the first page is the paper title
    pub detect_title: bool,
}

impl OutlineOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that every option is in range.
    pub fn validate(&self) -> Result<()> {
        if self.max_levels == 0 {
            return Err(Error::InvalidConfig("max_levels must be at least 1".into()));
        }
        if !self.size_margin.is_finite() || self.size_margin <= 1.0 {
            return Err(Error::InvalidConfig(format!(
                "size_margin must be greater than 1.0 (got {})",
                self.size_margin
            )));
        }
        if !self.min_pattern_ratio.is_finite() || self.min_pattern_ratio <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_pattern_ratio must be positive (got {})",
                self.min_pattern_ratio
            )));
        }
        if self.max_heading_length == 0 {
            return Err(Error::InvalidConfig(
                "max_heading_length must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Set the hierarchy depth cap.
    pub fn with_max_levels(mut self, levels: u8) -> Self {
        self.max_levels = levels;
        self
    }

    /// Set the font-size ratio margin.
    pub fn with_size_margin(mut self, margin: f32) -> Self {
        self.size_margin = margin;
        self
    }

    /// Set the heading length sanity bound.
    pub fn with_max_heading_length(mut self, length: usize) -> Self {
        self.max_heading_length = length;
        self
    }

    /// Set the smallest size ratio at which section patterns still count.
    pub fn with_min_pattern_ratio(mut self, ratio: f32) -> Self {
        self.min_pattern_ratio = ratio;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on undecodable page content instead of skipping it.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable parallel page extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable title-block detection.
    pub fn with_title_detection(mut self, detect: bool) -> Self {
        self.detect_title = detect;
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_levels: 4,
            size_margin: 1.15,
            max_heading_length: 120,
            min_pattern_ratio: 0.95,
            pages: PageSelection::All,
            error_mode: ErrorMode::Lenient,
            parallel: true,
            detect_title: true,
        }
    }
}

/// Error handling mode during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMode {
    /// Fail on any undecodable page
    Strict,
    /// Log and load the page without text
    #[default]
    Lenient,
}

/// Which pages to extract text from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// The first `n` pages.
    pub fn first(n: u32) -> Self {
        PageSelection::Range(1..=n)
    }

    /// Check if a page number (1-indexed) is selected.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid start page")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid end page")?;
                if start == 0 || end < start {
                    return Err(format!("Invalid page range {}-{}", start, end));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start: u32 = start.trim().parse().map_err(|_| "Invalid page number")?;
                let end: u32 = end.trim().parse().map_err(|_| "Invalid page number")?;
                for p in start..=end {
                    if !pages.contains(&p) {
                        pages.push(p);
                    }
                }
            } else {
                let p: u32 = part.parse().map_err(|_| "Invalid page number")?;
                if !pages.contains(&p) {
                    pages.push(p);
                }
            }
        }

        if pages.contains(&0) {
            return Err("Page numbers start at 1".to_string());
        }

        pages.sort();
        Ok(PageSelection::Pages(pages))
    }
}

impl std::fmt::Display for PageSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageSelection::All => write!(f, "all"),
            PageSelection::Range(range) => write!(f, "{}-{}", range.start(), range.end()),
            PageSelection::Pages(pages) => {
                let parts: Vec<String> = pages.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

impl TryFrom<String> for PageSelection {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        PageSelection::parse(&s)
    }
}

impl From<PageSelection> for String {
    fn from(selection: PageSelection) -> Self {
        selection.to_string()
    }
}
