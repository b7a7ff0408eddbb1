//! Outline reconciliation.
//!
//! Picks one of the two heading sources and turns it into a well-formed
//! outline: pages never decrease, the first level is 1, no level jumps more
//! than one step deeper than its predecessor, and order indices are
//! contiguous.

use crate::error::{Error, Result};
use crate::model::{EmbeddedOutlineEntry, HeadingCandidate, OutlineEntry};
use crate::normalize::{clean_text, comparison_key};

const DEFAULT_MAX_LEVELS: u8 = 4;

/// Merges embedded and heuristic headings into the final outline.
#[derive(Debug, Clone)]
pub struct Reconciler {
    page_count: usize,
    max_levels: u8,
}

impl Reconciler {
    /// Create a reconciler for a document with `page_count` pages.
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            max_levels: DEFAULT_MAX_LEVELS,
        }
    }

    /// Set the hierarchy depth cap.
    pub fn with_max_levels(mut self, max_levels: u8) -> Self {
        self.max_levels = max_levels.max(1);
        self
    }

    /// Choose a source and produce ordered outline entries.
    ///
    /// An embedded outline is used exclusively when every entry targets a page
    /// in range. Otherwise the heuristic candidates are used; when those are
    /// empty too, the in-range part of the embedded outline is kept.
    pub fn reconcile(
        &self,
        embedded: Option<Vec<EmbeddedOutlineEntry>>,
        heuristic: Vec<HeadingCandidate>,
    ) -> Result<Vec<OutlineEntry>> {
        let embedded = embedded.unwrap_or_default();

        if !embedded.is_empty() {
            let out_of_range = embedded
                .iter()
                .filter(|e| e.target_page >= self.page_count)
                .count();
            if out_of_range == 0 {
                log::debug!("Using embedded outline ({} entries)", embedded.len());
                return self.embedded_entries(embedded);
            }
            log::debug!(
                "Rejecting embedded outline: {} of {} entries point outside {} pages",
                out_of_range,
                embedded.len(),
                self.page_count
            );
        }

        if !heuristic.is_empty() {
            log::debug!("Using heuristic headings ({} candidates)", heuristic.len());
            return self.heuristic_entries(heuristic);
        }

        let in_range: Vec<EmbeddedOutlineEntry> = embedded
            .into_iter()
            .filter(|e| e.target_page < self.page_count)
            .collect();
        if !in_range.is_empty() {
            log::debug!(
                "No heuristic headings, keeping {} in-range embedded entries",
                in_range.len()
            );
            return self.embedded_entries(in_range);
        }

        Err(Error::NoHeadingsFound)
    }

    fn embedded_entries(&self, entries: Vec<EmbeddedOutlineEntry>) -> Result<Vec<OutlineEntry>> {
        let shift = entries.iter().map(|e| e.level).min().unwrap_or(1).max(1) - 1;
        let items: Vec<(String, u8, usize)> = entries
            .into_iter()
            .map(|e| (clean_text(&e.title), e.level - shift, e.target_page))
            .collect();
        self.finish(items)
    }

    fn heuristic_entries(&self, candidates: Vec<HeadingCandidate>) -> Result<Vec<OutlineEntry>> {
        let mut candidates = candidates;
        candidates.sort_by_key(|c| c.page_index);

        let mut items: Vec<(String, u8, usize)> = Vec::with_capacity(candidates.len());
        let mut last_key: Option<(usize, String)> = None;
        for candidate in candidates {
            let key = (candidate.page_index, comparison_key(&candidate.text));
            if last_key.as_ref() == Some(&key) {
                continue;
            }
            last_key = Some(key);
            items.push((
                clean_text(&candidate.text),
                candidate.inferred_level,
                candidate.page_index,
            ));
        }

        self.finish(items)
    }

    /// Sort by page, clamp levels and assign order indices.
    fn finish(&self, mut items: Vec<(String, u8, usize)>) -> Result<Vec<OutlineEntry>> {
        items.retain(|(title, _, _)| !title.trim().is_empty());
        if items.is_empty() {
            return Err(Error::NoHeadingsFound);
        }
        items.sort_by_key(|(_, _, page)| *page);

        let mut entries = Vec::with_capacity(items.len());
        let mut previous = 0u8;
        for (order_index, (title, level, page)) in items.into_iter().enumerate() {
            let level = level.clamp(1, self.max_levels).min(previous.saturating_add(1));
            previous = level;
            entries.push(OutlineEntry {
                title,
                level,
                page,
                order_index,
            });
        }

        Ok(entries)
    }
}

/// Reconcile with the default depth cap.
pub fn reconcile(
    embedded: Option<Vec<EmbeddedOutlineEntry>>,
    heuristic: Vec<HeadingCandidate>,
    page_count: usize,
) -> Result<Vec<OutlineEntry>> {
    Reconciler::new(page_count).reconcile(embedded, heuristic)
}
