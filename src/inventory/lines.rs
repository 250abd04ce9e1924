/// Separator placed between report lines.
pub const LINE_SEPARATOR: &str = "\r\n";

/// Collects output lines and joins them once at the end.
#[derive(Debug, Default, Clone)]
pub struct LineBuilder {
    lines: Vec<String>,
}

impl LineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Join with `separator`; no separator follows the last line.
    pub fn join(&self, separator: &str) -> String {
        self.lines.join(separator)
    }

    pub fn finish(self) -> String {
        self.join(LINE_SEPARATOR)
    }
}
