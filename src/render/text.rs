//! Plain text rendering for outlines.

use crate::error::Result;
use crate::model::Outline;

use super::RenderOptions;

/// Convert an outline to plain text, one indented line per entry.
pub fn to_text(outline: &Outline, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    if options.include_header {
        for part in [&outline.title, &outline.abstract_text] {
            if !part.trim().is_empty() {
                output.push_str(part);
                output.push_str("\n\n");
            }
        }
    }

    for entry in &outline.entries {
        output.push_str(&entry.to_string());
        output.push('\n');
    }

    Ok(output.trim_end().to_string())
}
