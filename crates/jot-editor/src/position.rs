//! Display coordinates for char offsets.
//!
//! The editing core addresses text by flat **char offsets** (Unicode scalar
//! values), which is what `ropey` indexes natively. `Position` exists only for
//! showing a cursor to a human: a 0-indexed (line, col) pair that formats as
//! 1-indexed `line:col`, the way status lines expect.

use std::fmt;

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line, **not** a byte offset.
/// For the line `"café\n"`, column 3 is `'é'` and column 4 is just past it.
///
/// Positions are ordered line first, then column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin: line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ZERO
    }
}
