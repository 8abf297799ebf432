//! Text buffer: the live text of one note while it is being edited.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes a small, checked editing
//! API addressed by **char offsets**.
//!
//! # Design choices
//!
//! - **ropey** provides O(log n) replace at any offset and Unicode-correct
//!   char indexing. We build a checked API on top rather than reimplementing
//!   text data structures.
//!
//! - **Offsets are chars**, not bytes. Offset 3 of `"café"` is `'é'`. Byte
//!   offsets never leak into the public API.
//!
//! - **Edits are checked.** A range outside the text returns an
//!   [`EditError`] and leaves the rope untouched, so a stale history record
//!   can never half-apply.
//!
//! - **No undo/redo here.** Edit history lives in [`crate::history`] and is
//!   driven by [`crate::session::EditSession`].

use std::fmt;
use std::ops::Range;

use ropey::Rope;

use crate::error::EditError;
use crate::position::Position;

/// A text buffer backed by a rope.
///
/// The buffer has no notion of a cursor; [`crate::surface::TextField`] pairs
/// one with a cursor offset.
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    // -- Text access --------------------------------------------------------

    /// Total number of lines. An empty buffer has 1 line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Copy out the text in `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or reaches past the end.
    pub fn slice(&self, range: Range<usize>) -> Result<String, EditError> {
        self.check_range(&range)?;
        Ok(self.rope.slice(range).to_string())
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a char offset to a display `Position`.
    ///
    /// Returns `None` if `char_idx > len_chars()`. An offset equal to
    /// `len_chars()` is the position just past the last character.
    #[must_use]
    pub fn char_idx_to_pos(&self, char_idx: usize) -> Option<Position> {
        if char_idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        Some(Position::new(line, char_idx - line_start))
    }

    // -- Editing ------------------------------------------------------------

    /// Replace the text in `range` with `text`.
    ///
    /// An empty range is a pure insert, an empty `text` a pure delete.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or reaches past the end. The
    /// buffer is unchanged on error.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        self.check_range(&range)?;
        if range.is_empty() && text.is_empty() {
            return Ok(());
        }
        let start = range.start;
        self.rope.remove(range);
        self.rope.insert(start, text);
        Ok(())
    }

    /// Insert `text` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is past the end of the buffer.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.replace(offset..offset, text)
    }

    /// Delete the text in `range`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or reaches past the end.
    pub fn delete(&mut self, range: Range<usize>) -> Result<(), EditError> {
        self.replace(range, "")
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), EditError> {
        if range.start > range.end {
            return Err(EditError::InvertedRange {
                start: range.start,
                end: range.end,
            });
        }
        let len = self.rope.len_chars();
        if range.end > len {
            return Err(EditError::OutOfBounds {
                offset: range.end,
                len,
            });
        }
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_is_empty() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len_chars(), 0);
        assert_eq!(buf.line_count(), 1); // empty buffer has one empty line
    }

    #[test]
    fn from_text_counts_chars_not_bytes() {
        let buf = Buffer::from_text("café\nbar");
        assert_eq!(buf.len_chars(), 8);
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.slice(3..4).unwrap(), "é");
    }

    #[test]
    fn default_is_new() {
        assert!(Buffer::default().is_empty());
    }

    // -- Slice --------------------------------------------------------------

    #[test]
    fn slice_valid() {
        let buf = Buffer::from_text("hello world");
        assert_eq!(buf.slice(0..5).unwrap(), "hello");
        assert_eq!(buf.slice(6..11).unwrap(), "world");
        assert_eq!(buf.slice(3..3).unwrap(), "");
    }

    #[test]
    fn slice_multibyte() {
        let buf = Buffer::from_text("naïve café");
        assert_eq!(buf.slice(2..3).unwrap(), "ï");
        assert_eq!(buf.slice(6..10).unwrap(), "café");
    }

    #[test]
    fn slice_out_of_bounds() {
        let buf = Buffer::from_text("hi");
        assert_eq!(
            buf.slice(0..3),
            Err(EditError::OutOfBounds { offset: 3, len: 2 })
        );
    }

    #[test]
    fn slice_inverted() {
        let buf = Buffer::from_text("hello");
        #[allow(clippy::reversed_empty_ranges)]
        let result = buf.slice(4..1);
        assert_eq!(result, Err(EditError::InvertedRange { start: 4, end: 1 }));
    }

    // -- Coordinate conversion ----------------------------------------------

    #[test]
    fn char_idx_to_pos_basic() {
        let buf = Buffer::from_text("hello\nworld");
        assert_eq!(buf.char_idx_to_pos(0), Some(Position::new(0, 0)));
        assert_eq!(buf.char_idx_to_pos(5), Some(Position::new(0, 5)));
        assert_eq!(buf.char_idx_to_pos(6), Some(Position::new(1, 0)));
        assert_eq!(buf.char_idx_to_pos(11), Some(Position::new(1, 5)));
    }

    #[test]
    fn char_idx_to_pos_out_of_bounds() {
        let buf = Buffer::from_text("hi");
        assert_eq!(buf.char_idx_to_pos(3), None);
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn insert_in_middle() {
        let mut buf = Buffer::from_text("hllo");
        buf.insert(1, "e").unwrap();
        assert_eq!(buf.contents(), "hello");
    }

    #[test]
    fn insert_at_end() {
        let mut buf = Buffer::from_text("cat");
        buf.insert(3, "s").unwrap();
        assert_eq!(buf.contents(), "cats");
    }

    #[test]
    fn insert_past_end_fails_untouched() {
        let mut buf = Buffer::from_text("cat");
        assert_eq!(
            buf.insert(4, "s"),
            Err(EditError::OutOfBounds { offset: 4, len: 3 })
        );
        assert_eq!(buf.contents(), "cat");
    }

    #[test]
    fn delete_range() {
        let mut buf = Buffer::from_text("hello world");
        buf.delete(5..11).unwrap();
        assert_eq!(buf.contents(), "hello");
    }

    #[test]
    fn replace_range() {
        let mut buf = Buffer::from_text("hello world");
        buf.replace(6..11, "there").unwrap();
        assert_eq!(buf.contents(), "hello there");
    }

    #[test]
    fn replace_multiline() {
        let mut buf = Buffer::from_text("first\nsecond\nthird");
        buf.replace(5..13, " ").unwrap();
        assert_eq!(buf.contents(), "first third");
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn empty_replace_is_noop() {
        let mut buf = Buffer::from_text("abc");
        buf.replace(1..1, "").unwrap();
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn debug_summarizes() {
        let buf = Buffer::from_text("a\nb");
        let dbg = format!("{buf:?}");
        assert!(dbg.contains("lines: 2"));
        assert!(dbg.contains("chars: 3"));
    }
}
