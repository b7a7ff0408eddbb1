//! Page-level types.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in PDF user space (origin bottom-left, y grows upward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box for a run of text starting at a baseline point.
    ///
    /// Glyph widths are not available without font metrics, so the width is
    /// estimated as half an em per character; ascender and descender are
    /// approximated as 80% and 20% of the font size.
    pub fn from_baseline(x: f32, baseline: f32, font_size: f32, char_count: usize) -> Self {
        Self {
            x0: x,
            y0: baseline - font_size * 0.2,
            x1: x + estimated_width(font_size, char_count),
            y1: baseline + font_size * 0.8,
        }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Baseline recovered from the box (inverse of [`BoundingBox::from_baseline`]).
    pub fn baseline(&self) -> f32 {
        self.y0 + self.height() * 0.2
    }
}

/// Estimated advance width of `char_count` characters at `font_size`.
pub(crate) fn estimated_width(font_size: f32, char_count: usize) -> f32 {
    font_size * 0.5 * char_count as f32
}

/// A run of text with position and style information. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Effective font size in points (text matrix scale applied)
    pub font_size: f32,
    /// Estimated extent of the run
    pub bounding_box: BoundingBox,
    /// 0-based index of the page the span sits on
    pub page_index: usize,
    /// Base font name (e.g., "Helvetica-Bold"), empty when unknown
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        bounding_box: BoundingBox,
        page_index: usize,
    ) -> Self {
        Self {
            text: text.into(),
            font_size,
            bounding_box,
            page_index,
            font_name: String::new(),
            is_bold: false,
        }
    }

    /// Attach the base font name, deriving boldness from it.
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = font_name.into();
        let lower = self.font_name.to_lowercase();
        self.is_bold =
            lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        self
    }

    /// Baseline Y coordinate.
    pub fn baseline(&self) -> f32 {
        self.bounding_box.baseline()
    }
}

/// A single page in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-based)
    pub index: usize,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Text spans in content-stream order
    pub text_spans: Vec<TextSpan>,
}

impl Page {
    /// Create a new empty page with the given dimensions.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            text_spans: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(index: usize) -> Self {
        Self::new(index, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Append a span, stamping it with this page's index.
    pub fn add_span(&mut self, mut span: TextSpan) {
        span.page_index = self.index;
        self.text_spans.push(span);
    }

    /// Check if the page carries no text.
    pub fn is_empty(&self) -> bool {
        self.text_spans.is_empty()
    }

    /// Plain text of the page, one span per line.
    pub fn plain_text(&self) -> String {
        self.text_spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
