//! Markdown rendering for outlines.
//!
//! Each entry becomes an ATX heading with one `#` per level. With numbering
//! enabled, entries that do not carry their own enumeration get hierarchical
//! section numbers, and top-level entries after the concluding section are
//! lettered as appendices.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::model::{Outline, OutlineEntry};

use super::RenderOptions;

/// Titles that already start with "3", "3.1.", "IV." or "A.2".
static ENUMERATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)*\.?|[IVX]+\.|[A-Z]\.(?:\d+(?:\.\d+)*\.?)?)\s").unwrap()
});

const CONCLUDING: &[&str] = &["conclusion", "concluding", "final remarks", "summary"];

/// Convert an outline to Markdown.
pub fn to_markdown(outline: &Outline, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(outline)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render an outline to Markdown.
    pub fn render(&self, outline: &Outline) -> Result<String> {
        let mut output = String::new();

        if self.options.include_header {
            if !outline.title.trim().is_empty() {
                output.push_str(&format!("**{}**\n\n", outline.title));
            }
            if !outline.abstract_text.trim().is_empty() {
                output.push_str(&format!("> {}\n\n", outline.abstract_text));
            }
        }

        let mut numbering = SectionNumbering::default();
        for entry in &outline.entries {
            let number = if self.options.numbered {
                Some(numbering.next(entry))
            } else {
                None
            };
            self.render_entry(&mut output, entry, number.as_deref());
        }

        Ok(output.trim_end().to_string())
    }

    fn render_entry(&self, output: &mut String, entry: &OutlineEntry, number: Option<&str>) {
        output.push_str(&"#".repeat(entry.level.max(1) as usize));
        output.push(' ');
        if let Some(number) = number {
            if !ENUMERATED.is_match(&entry.title) {
                output.push_str(number);
                output.push(' ');
            }
        }
        output.push_str(&entry.title);
        output.push('\n');
    }
}

/// Hierarchical section counters with appendix lettering.
#[derive(Debug, Default)]
struct SectionNumbering {
    counters: Vec<usize>,
    concluded: bool,
    appendices: usize,
}

impl SectionNumbering {
    /// Advance the counters for `entry` and return its number.
    fn next(&mut self, entry: &OutlineEntry) -> String {
        let depth = entry.level.max(1) as usize;
        self.counters.resize(depth, 0);

        let appendix = depth == 1 && self.concluded;
        if appendix {
            self.appendices += 1;
        }
        self.counters[depth - 1] += 1;

        if depth == 1 && is_concluding(&entry.title) {
            self.concluded = true;
        }

        if self.appendices > 0 {
            let mut parts = vec![appendix_letter(self.appendices)];
            parts.extend(self.counters[1..].iter().map(|n| n.to_string()));
            parts.join(".")
        } else {
            self.counters
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(".")
        }
    }
}

fn is_concluding(title: &str) -> bool {
    let lower = title.to_lowercase();
    CONCLUDING.iter().any(|keyword| lower.contains(keyword))
}

/// A, B, ..., Z, AA, AB, ...
fn appendix_letter(n: usize) -> String {
    let mut n = n;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}
