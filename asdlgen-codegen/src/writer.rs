//! Line-oriented output sink.

/// Indentation unit for generated code.
const INDENT: &str = "  ";

/// Append-only buffer of generated lines.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
}

impl CodeWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line at the given indentation depth.
    pub fn emit(&mut self, line: &str, depth: usize) {
        if !line.is_empty() {
            for _ in 0..depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(line);
        }
        self.buf.push('\n');
    }

    /// Appends an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Consumes the writer, returning the text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}
