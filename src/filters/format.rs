//! Indented tree rendering for filter configurations.
//!
//! Both the raw reverse-engineering tree and the compiled filter set render to
//! the same line-oriented layout, two spaces per nesting level.

/// Text written in place of an absent catalog, schema or table name.
pub const NULL_NAME: &str = "null";

const STEP: &str = "  ";

/// Render an optional name the way tree renderings expect.
#[must_use]
pub fn display_name(name: Option<&str>) -> &str {
    name.unwrap_or(NULL_NAME)
}

/// Accumulates `Label: value` lines, one nesting level per [`nested`](Self::nested) call.
#[derive(Debug, Default)]
pub struct TreeWriter {
    out: String,
    depth: usize,
}

impl TreeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a line verbatim at the current depth.
    pub fn line(&mut self, text: &str) {
        self.out.extend(std::iter::repeat(STEP).take(self.depth));
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn entry(&mut self, label: &str, value: &str) {
        self.line(&format!("{label}: {value}"));
    }

    pub fn entries<'a>(&mut self, label: &str, values: impl IntoIterator<Item = &'a str>) {
        values.into_iter().for_each(|value| self.entry(label, value));
    }

    /// Run `body` one level deeper.
    pub fn nested(&mut self, body: impl FnOnce(&mut Self)) {
        self.depth += 1;
        body(self);
        self.depth -= 1;
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}
