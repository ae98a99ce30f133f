//! Line structure of an editor document.

use serde::{Deserialize, Serialize};

/// A half-open byte range in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Creates a new range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the range is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Zero-based line table over a document's text.
///
/// A document always has at least one line; a trailing newline opens an
/// empty last line. Line ends exclude the `\n` or `\r\n` terminator.
#[derive(Debug, Clone)]
pub struct LineIndex {
    lines: Vec<TextRange>,
}

impl LineIndex {
    /// Builds the line table for `text`.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;

        for (newline, _) in text.match_indices('\n') {
            let end = if newline > start && bytes[newline - 1] == b'\r' {
                newline - 1
            } else {
                newline
            };
            lines.push(TextRange::new(start, end));
            start = newline + 1;
        }
        lines.push(TextRange::new(start, text.len()));

        Self { lines }
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the range of a zero-based line, without its terminator.
    pub fn line_range(&self, line: usize) -> Option<TextRange> {
        self.lines.get(line).copied()
    }

    /// Returns the start offset of a zero-based line.
    pub fn line_start_offset(&self, line: usize) -> Option<usize> {
        self.line_range(line).map(|r| r.start)
    }

    /// Returns the end offset of a zero-based line.
    pub fn line_end_offset(&self, line: usize) -> Option<usize> {
        self.line_range(line).map(|r| r.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_range(0), Some(TextRange::new(0, 0)));
        assert_eq!(index.line_range(1), None);
    }

    #[test]
    fn test_lines_exclude_terminators() {
        let text = "a = 1\nfoo()\r\n\nbar";
        let index = LineIndex::new(text);

        assert_eq!(index.line_count(), 4);
        assert_eq!(&text[index.line_range(0).unwrap().start..index.line_end_offset(0).unwrap()], "a = 1");
        assert_eq!(index.line_range(1), Some(TextRange::new(6, 11)));
        assert_eq!(index.line_range(2), Some(TextRange::new(13, 13)));
        assert_eq!(index.line_range(3), Some(TextRange::new(14, 17)));
    }

    #[test]
    fn test_trailing_newline_opens_empty_line() {
        let index = LineIndex::new("x\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_start_offset(1), Some(2));
        assert!(index.line_range(1).unwrap().is_empty());
    }

    #[test]
    fn test_multibyte_offsets_are_bytes() {
        let index = LineIndex::new("é\nx");
        assert_eq!(index.line_range(0).unwrap().len(), 2);
        assert_eq!(index.line_start_offset(1), Some(3));
    }
}
