//! Source position types.
//!
//! Tokens, AST nodes and diagnostics all refer back to the source text
//! through a `Position`: a 1-based line and a 1-based column.

use std::fmt;

/// A position in source text.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The first character of a file.
    #[inline]
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Whether `self` sits on the line immediately before `other`.
    #[inline]
    pub fn is_line_above(&self, other: Position) -> bool {
        self.line + 1 == other.line
    }

    /// Whether `other` starts exactly one column after `self` on the same line.
    #[inline]
    pub fn is_adjacent_to(&self, other: Position) -> bool {
        self.line == other.line && self.column + 1 == other.column
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
