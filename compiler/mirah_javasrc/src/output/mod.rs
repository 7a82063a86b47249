//! Indentation-aware text buffer.
//!
//! Every class and method builder owns one. Indentation is applied lazily:
//! when the first character of a line is written, never at `indent()` time,
//! so `print` calls can build a line piecewise.

use crate::config::INDENT_WIDTH;

/// Accumulates generated source text.
#[derive(Clone, Debug)]
pub struct Output {
    text: String,
    /// Current indentation in spaces.
    depth: usize,
    /// Spaces added by one `indent()`.
    step: usize,
    /// Nothing has been written on the current line yet.
    at_line_start: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self::with_indent_width(INDENT_WIDTH)
    }

    pub fn with_indent_width(step: usize) -> Self {
        Self {
            text: String::with_capacity(256),
            depth: 0,
            step,
            at_line_start: true,
        }
    }

    /// Continue the current line.
    ///
    /// Embedded newlines start new lines, each indented on its first
    /// character. Empty lines stay empty.
    pub fn print(&mut self, text: &str) {
        for piece in text.split_inclusive('\n') {
            if self.at_line_start && piece != "\n" {
                self.write_indent();
            }
            self.text.push_str(piece);
            self.at_line_start = piece.ends_with('\n');
        }
    }

    /// Finish the current line with `line`.
    pub fn puts(&mut self, line: &str) {
        self.print(line);
        self.text.push('\n');
        self.at_line_start = true;
    }

    /// One terminated line per item.
    pub fn puts_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.puts(line.as_ref());
        }
    }

    pub fn indent(&mut self) {
        self.depth += self.step;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.depth >= self.step, "dedent called with zero indent");
        self.depth = self.depth.saturating_sub(self.step);
    }

    /// Splice another buffer's text, shifting each of its lines to this
    /// buffer's current depth. A partial line is terminated first so the
    /// spliced text starts on a line of its own.
    pub fn append(&mut self, other: &Output) {
        if !self.at_line_start {
            self.print("\n");
        }
        self.print(&other.text);
    }

    /// Current indentation in spaces.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }

    fn write_indent(&mut self) {
        for _ in 0..self.depth {
            self.text.push(' ');
        }
    }
}
