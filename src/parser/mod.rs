//! PDF loading module.

mod content;
mod loader;
mod options;

pub use loader::{load, load_file, load_with_options, PdfLoader};
pub use options::{ErrorMode, OutlineOptions, PageSelection};
