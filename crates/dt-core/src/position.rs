use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A location in source text. Both fields are 0-indexed; `column` counts
/// bytes from the start of the line, matching tree-sitter points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub const fn line_start(line: u32) -> Self {
        Self { line, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open range of source text, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span covering whole lines `first..=last`.
    pub const fn lines(first: u32, last: u32) -> Self {
        Self {
            start: Position::new(first, 0),
            end: Position::new(last, u32::MAX),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `pos` lies within the span, both ends inclusive.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Offset/position conversion over one snapshot of source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where `line` starts.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).copied()
    }

    /// Text of `line` without its terminator (`\n` or `\r\n`).
    pub fn line_text(&self, line: u32) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        let raw = &self.text[start..end];
        Some(raw.strip_suffix('\r').unwrap_or(raw))
    }

    /// Leading whitespace of `line`; empty when the line does not exist.
    pub fn indentation(&self, line: u32) -> &'a str {
        let text = self.line_text(line).unwrap_or("");
        let width = text.len() - text.trim_start_matches([' ', '\t']).len();
        &text[..width]
    }

    /// Newline sequence used by the text: `\r\n` when any line uses it.
    pub fn newline(&self) -> &'static str {
        if self.text.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    pub fn position_of(&self, offset: usize) -> Result<Position, CoreError> {
        if offset > self.text.len() {
            return Err(CoreError::OffsetOutOfBounds {
                offset,
                len: self.text.len(),
            });
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        Ok(Position::new(
            line as u32,
            (offset - self.line_starts[line]) as u32,
        ))
    }

    /// Byte offset of `pos`. Columns past the end of the line clamp to the
    /// line end only when `column == u32::MAX` (the "whole line" sentinel).
    pub fn offset_of(&self, pos: Position) -> Result<usize, CoreError> {
        let invalid = CoreError::InvalidPosition {
            line: pos.line,
            column: pos.column,
        };
        let start = self.line_start(pos.line).ok_or(invalid)?;
        let line_len = self.line_text(pos.line).map(str::len).unwrap_or(0);
        if pos.column == u32::MAX {
            return Ok(start + line_len);
        }
        let column = pos.column as usize;
        if column > line_len || !self.text.is_char_boundary(start + column) {
            return Err(CoreError::InvalidPosition {
                line: pos.line,
                column: pos.column,
            });
        }
        Ok(start + column)
    }
}
