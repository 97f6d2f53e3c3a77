//! Formatting options for SSE output.

/// Options for SSE serialization.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Indentation unit (default: two spaces).
    pub indent: &'static str,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: "  " }
    }
}

impl WriteOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom indentation unit.
    pub fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self
    }
}
