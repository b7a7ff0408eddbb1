//! Outline types: intermediate heading signals and the canonical result.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a line was classified as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingSignal {
    /// Font size above the body-text margin only
    FontSize,
    /// Decimal enumeration such as "2." or "3.1"
    Numbered,
    /// Roman-numeral enumeration such as "IV."
    Roman,
    /// Canonical section name such as "Introduction"
    Keyword,
}

/// A line provisionally classified as a section heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Line text, trimmed
    pub text: String,
    /// 0-based page index
    pub page_index: usize,
    /// Line font size in points
    pub font_size: f32,
    /// Heuristic confidence in [0, 1]
    pub score: f32,
    /// Hierarchy level, 1 = top section
    pub inferred_level: u8,
    /// Strongest signal that produced the candidate
    pub signal: HeadingSignal,
}

/// An entry of the PDF's own bookmark outline, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedOutlineEntry {
    pub title: String,
    /// Nesting level, shallowest entries at 1
    pub level: u8,
    /// 0-based destination page
    pub target_page: usize,
}

impl EmbeddedOutlineEntry {
    pub fn new(title: impl Into<String>, level: u8, target_page: usize) -> Self {
        Self {
            title: title.into(),
            level,
            target_page,
        }
    }
}

/// One heading of the final outline.
///
/// Within an outline `order_index` is contiguous from 0, `page` never
/// decreases, the first `level` is 1 and no `level` exceeds the previous
/// one by more than 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Cleaned heading text
    pub title: String,
    /// Hierarchy level, 1 = top section
    pub level: u8,
    /// 0-based page index
    pub page: usize,
    /// Position in the outline
    pub order_index: usize,
}

impl OutlineEntry {
    /// Indentation for this entry: two spaces per level beyond 1.
    pub fn indent(&self) -> String {
        "  ".repeat(self.level.saturating_sub(1) as usize)
    }
}

impl fmt::Display for OutlineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} (p.{})", self.indent(), self.title, self.page + 1)
    }
}

/// Title, abstract and ordered headings of one paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Create an outline from its parts.
    pub fn new(
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        entries: Vec<OutlineEntry>,
    ) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            entries,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deepest level used by any entry (0 for an empty outline).
    pub fn depth(&self) -> u8 {
        self.entries.iter().map(|e| e.level).max().unwrap_or(0)
    }

    /// Entries at level 1.
    pub fn top_level(&self) -> impl Iterator<Item = &OutlineEntry> {
        self.entries.iter().filter(|e| e.level == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, level: u8, page: usize, order_index: usize) -> OutlineEntry {
        OutlineEntry {
            title: title.to_string(),
            level,
            page,
            order_index,
        }
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(entry("Introduction", 1, 0, 0).to_string(), "Introduction (p.1)");
        assert_eq!(entry("2.1 Data", 2, 4, 3).to_string(), "  2.1 Data (p.5)");
        assert_eq!(entry("2.1.1 Split", 3, 4, 4).to_string(), "    2.1.1 Split (p.5)");
    }

    #[test]
    fn test_outline_depth_and_top_level() {
        let outline = Outline::new(
            "Paper",
            "Abstract.",
            vec![
                entry("1 Intro", 1, 0, 0),
                entry("1.1 Scope", 2, 0, 1),
                entry("2 Method", 1, 2, 2),
            ],
        );
        assert_eq!(outline.len(), 3);
        assert_eq!(outline.depth(), 2);
        assert_eq!(outline.top_level().count(), 2);
    }

    #[test]
    fn test_outline_serializes_abstract_key() {
        let outline = Outline::new("T", "A", vec![]);
        let json = serde_json::to_string(&outline).unwrap();
        assert!(json.contains("\"abstract\":\"A\""));
    }
}
