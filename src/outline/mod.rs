//! Outline extraction: embedded bookmarks, heuristic headings and their
//! reconciliation into one ordered outline.

mod embedded;
mod heuristic;
mod reconcile;

pub use embedded::read_embedded;
pub use heuristic::{
    classify_line, detect, group_lines, Detection, FontStatistics, HeadingDetector, TextLine,
};
pub use reconcile::{reconcile, Reconciler};
