//! The text-input surface an editing session drives.
//!
//! [`TextSurface`] is the seam between the editing core and whatever shows
//! the text to the user. The session only ever reads text, replaces ranges
//! and moves the cursor; a widget binding implements those three things and
//! nothing else. [`TextField`] is the in-process implementation: a
//! [`Buffer`] plus a cursor offset.

use std::ops::Range;

use crate::buffer::Buffer;
use crate::error::EditError;
use crate::position::Position;

/// A mutable text surface addressed by char offsets.
pub trait TextSurface {
    /// Total length in chars.
    fn len_chars(&self) -> usize;

    /// The whole text.
    fn contents(&self) -> String;

    /// Copy out the text in `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or reaches past the end.
    fn slice(&self, range: Range<usize>) -> Result<String, EditError>;

    /// Replace the text in `range` with `text`. Implementations must leave
    /// the text untouched when they return an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or reaches past the end.
    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError>;

    /// The cursor offset.
    fn cursor(&self) -> usize;

    /// Move the cursor. Offsets past the end are clamped to the end.
    fn set_cursor(&mut self, offset: usize);
}

/// A [`Buffer`] with a cursor.
#[derive(Debug, Default)]
pub struct TextField {
    buffer: Buffer,
    cursor: usize,
}

impl TextField {
    /// An empty field with the cursor at 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A field holding `text`, cursor at 0.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Buffer::from_text(text),
            cursor: 0,
        }
    }

    /// The cursor as a display position.
    #[must_use]
    pub fn cursor_position(&self) -> Position {
        self.buffer
            .char_idx_to_pos(self.cursor)
            .unwrap_or(Position::ZERO)
    }
}

impl TextSurface for TextField {
    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn contents(&self) -> String {
        self.buffer.contents()
    }

    fn slice(&self, range: Range<usize>) -> Result<String, EditError> {
        self.buffer.slice(range)
    }

    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        self.buffer.replace(range, text)?;
        // Keep the cursor inside the text; callers reposition it afterwards.
        self.cursor = self.cursor.min(self.buffer.len_chars());
        Ok(())
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.buffer.len_chars());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_cursor_clamps() {
        let mut f = TextField::from_text("abc");
        f.set_cursor(10);
        assert_eq!(f.cursor(), 3);
    }

    #[test]
    fn replace_keeps_cursor_in_bounds() {
        let mut f = TextField::from_text("hello");
        f.set_cursor(5);
        f.replace(1..5, "").unwrap();
        assert_eq!(f.contents(), "h");
        assert_eq!(f.cursor(), 1);
    }

    #[test]
    fn cursor_position_tracks_lines() {
        let mut f = TextField::from_text("one\ntwo");
        f.set_cursor(5);
        assert_eq!(f.cursor_position(), Position::new(1, 1));
    }

    #[test]
    fn failed_replace_leaves_text() {
        let mut f = TextField::from_text("abc");
        assert!(f.replace(2..9, "x").is_err());
        assert_eq!(f.contents(), "abc");
    }
}
