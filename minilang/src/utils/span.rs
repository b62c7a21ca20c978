//! Source locations
//!
//! Positions count characters, not display cells: a tab advances the column
//! by one. This keeps atom spans consistent with diagnostic columns, which
//! are computed by searching the line text.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// First column of a 1-based line, at the given byte offset
    pub fn line_start(line: u32, offset: usize) -> Self {
        Self::new(offset, line, 1)
    }

    /// Advance past one character on the same line
    pub fn advance(self, ch: char) -> Self {
        Self {
            offset: self.offset + ch.len_utf8(),
            line: self.line,
            column: self.column + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start (inclusive) to end (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.offset <= end.offset,
            "Span start must not be after end"
        );
        Self { start, end }
    }

    /// Zero-width span at a position
    pub fn point(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Line index over a source text, used to render errors with context
#[derive(Debug, Clone)]
pub struct SourceMap {
    source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .char_indices()
                    .filter(|(_, ch)| *ch == '\n')
                    .map(|(offset, _)| offset + 1),
            )
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Text of a 1-based line without its terminator
    pub fn line(&self, line_num: u32) -> Option<&str> {
        let idx = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        self.source
            .get(start..end)
            .map(|text| text.trim_end_matches('\r'))
    }

    /// Render a message with the offending line and a caret underline
    pub fn format_error(&self, line: u32, column: u32, width: usize, message: &str) -> String {
        let mut result = format!("error: {}\n  --> {}:{}\n", message, line, column);

        if let Some(text) = self.line(line) {
            let gutter = line.to_string();
            let padding = " ".repeat(gutter.len());
            result.push_str(&format!("{} |\n", padding));
            result.push_str(&format!("{} | {}\n", gutter, text));
            result.push_str(&format!(
                "{} | {}{}\n",
                padding,
                " ".repeat(column.saturating_sub(1) as usize),
                "^".repeat(width.max(1))
            ));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance() {
        let pos = Position::line_start(3, 10).advance('x').advance('\t');
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.offset, 12);
    }

    #[test]
    fn test_span_display_and_len() {
        let span = Span::new(Position::new(0, 1, 1), Position::new(6, 1, 7));
        assert_eq!(span.to_string(), "1:1-7");
        assert_eq!(span.len(), 6);
        assert!(Span::point(Position::new(99, 1, 1)).is_empty());
    }

    #[test]
    fn test_source_map_lines() {
        let map = SourceMap::new("x : integer ;\r\n\noutput << x ;");
        assert_eq!(map.line(1), Some("x : integer ;"));
        assert_eq!(map.line(2), Some(""));
        assert_eq!(map.line(3), Some("output << x ;"));
        assert_eq!(map.line(0), None);
        assert_eq!(map.line(4), None);
    }

    #[test]
    fn test_format_error_underlines_column() {
        let map = SourceMap::new("x : integer ;;");
        let rendered = map.format_error(1, 13, 2, "unexpected ERROR");
        assert!(rendered.contains("--> 1:13"));
        assert!(rendered.contains("1 | x : integer ;;"));
        assert!(rendered.ends_with(&format!("  | {}^^\n", " ".repeat(12))));
    }
}
