//! Embedded outline (bookmark) reader.

use crate::model::{Document, EmbeddedOutlineEntry};
use crate::normalize::clean_text;

/// Normalize the document's own bookmarks.
///
/// Returns `None` when the document declares no outline or none of its
/// entries is usable. Entries whose destination did not resolve are skipped
/// with a warning. Levels are shifted so the shallowest entry is level 1.
pub fn read_embedded(doc: &Document) -> Option<Vec<EmbeddedOutlineEntry>> {
    if !doc.has_bookmarks() {
        return None;
    }

    let usable: Vec<(String, u32, usize)> = doc
        .bookmarks
        .iter()
        .filter_map(|bookmark| {
            let target = match bookmark.target {
                Some(target) => target,
                None => {
                    log::warn!(
                        "Skipping bookmark {:?}: destination could not be resolved",
                        bookmark.title
                    );
                    return None;
                }
            };

            let title = clean_text(&bookmark.title);
            if title.trim().is_empty() {
                log::debug!("Skipping untitled bookmark to page {}", target + 1);
                return None;
            }

            Some((title, bookmark.depth, target))
        })
        .collect();

    let shallowest = usable.iter().map(|(_, depth, _)| *depth).min()?;

    Some(
        usable
            .into_iter()
            .map(|(title, depth, target)| {
                let level = (depth - shallowest + 1).min(u8::MAX as u32) as u8;
                EmbeddedOutlineEntry::new(title, level, target)
            })
            .collect(),
    )
}
