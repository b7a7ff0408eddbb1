//! Document model types.
//!
//! `Document`/`Page`/`TextSpan` are what the loader produces from PDF bytes;
//! `HeadingCandidate` and `EmbeddedOutlineEntry` are the two intermediate
//! heading sources; `Outline`/`OutlineEntry` are the canonical result.

mod document;
mod outline;
mod page;

pub use document::{Bookmark, Document, DocumentInfo};
pub use outline::{EmbeddedOutlineEntry, HeadingCandidate, HeadingSignal, Outline, OutlineEntry};
pub(crate) use page::estimated_width;
pub use page::{BoundingBox, Page, TextSpan};
