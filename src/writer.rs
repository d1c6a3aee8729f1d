//! The output sink generated code is written through.

/// A text buffer that tracks the current indentation depth. Indentation is tabs, as gofmt
/// writes it.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current depth. An empty line gets no indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push('\t');
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn lines<S: AsRef<str>>(&mut self, lines: impl IntoIterator<Item = S>) {
        for line in lines {
            self.line(line);
        }
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Writes `open`, then the lines `body` writes one level deeper, then `close`.
    pub fn block(&mut self, open: impl AsRef<str>, close: &str, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close);
    }

    /// Appends the text of another writer as is.
    pub fn append(&mut self, other: CodeWriter) {
        self.buf.push_str(&other.buf);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// A generated file, addressed relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: String,
    pub contents: String,
    /// Whether hand-written code in an existing copy should be preserved on regeneration
    pub mergeable: bool,
}

impl OutputFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            mergeable: false,
        }
    }

    pub fn mergeable(mut self) -> Self {
        self.mergeable = true;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_indent() {
        let mut w = CodeWriter::new();
        w.block("func f() {", "}", |w| {
            w.line("x := 1");
            w.line("");
            w.block("if x > 0 {", "}", |w| w.line("return"));
        });
        assert_eq!(
            w.into_string(),
            "func f() {\n\tx := 1\n\n\tif x > 0 {\n\t\treturn\n\t}\n}\n"
        );
    }

    #[test]
    fn test_dedent_saturates() {
        let mut w = CodeWriter::new();
        w.dedent();
        w.line("a");
        assert_eq!(w.depth(), 0);
        assert_eq!(w.as_str(), "a\n");
    }
}
