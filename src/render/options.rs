//! Rendering options.

/// Options for rendering an outline.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Put the title and abstract before the entries
    pub include_header: bool,

    /// Prefix Markdown headings with section numbers
    pub numbered: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the title/abstract header.
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Enable or disable section numbering.
    pub fn with_numbering(mut self, numbered: bool) -> Self {
        self.numbered = numbered;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_header: true,
            numbered: false,
        }
    }
}
