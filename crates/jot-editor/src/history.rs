//! Undo/redo history: a linear log of text edits with a cursor.
//!
//! Every user-driven change to a note is recorded as an [`EditRecord`]: the
//! offset where it happened, the exact text removed there, and the exact text
//! inserted. [`EditHistory`] keeps those records in order together with a
//! `position` that counts how many of them are currently applied.
//!
//! ```text
//! records:   [r0, r1, r2, r3]
//! position:            ^ 2      undo → r1, redo → r2
//! ```
//!
//! Undo steps the position back and hands out the record it passed over;
//! redo hands out the record at the position and steps forward. A single log
//! with a cursor (rather than two stacks) keeps the redo tail intact across
//! any number of undo/redo cycles, until a genuinely new edit arrives. Adding
//! a record while the position is behind the end discards the redo tail.
//!
//! The history never touches text itself. The caller applies the returned
//! record with [`EditRecord::undo_on`] or [`EditRecord::redo_on`], and must
//! make sure the change notifications those applications produce are not
//! recorded again (see [`crate::session`]).

use tracing::debug;

use crate::error::EditError;
use crate::surface::TextSurface;

// ---------------------------------------------------------------------------
// EditRecord
// ---------------------------------------------------------------------------

/// One recorded text mutation.
///
/// `before` and `after` are the exact fragments removed and inserted at
/// `start`, which is enough to replay the change in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// Char offset where the mutation began.
    pub start: usize,
    /// Text removed at `start` (possibly empty).
    pub before: String,
    /// Text inserted at `start` (possibly empty).
    pub after: String,
}

impl EditRecord {
    /// Create a record.
    #[must_use]
    pub fn new(start: usize, before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            start,
            before: before.into(),
            after: after.into(),
        }
    }

    /// Length of `before` in chars.
    #[inline]
    #[must_use]
    pub fn before_len(&self) -> usize {
        self.before.chars().count()
    }

    /// Length of `after` in chars.
    #[inline]
    #[must_use]
    pub fn after_len(&self) -> usize {
        self.after.chars().count()
    }

    /// True when the record changes nothing.
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }

    /// Apply the inverse of this record: `[start, start + len(after))`
    /// becomes `before`. Returns the cursor offset to restore, which is just
    /// past the restored text.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface no longer holds the range.
    pub fn undo_on(&self, surface: &mut impl TextSurface) -> Result<usize, EditError> {
        let end = self.end_of(self.after_len(), surface)?;
        surface.replace(self.start..end, &self.before)?;
        let cursor = self.start + self.before_len();
        surface.set_cursor(cursor);
        Ok(cursor)
    }

    /// Apply this record forward: `[start, start + len(before))` becomes
    /// `after`. Returns the cursor offset to restore, just past the inserted
    /// text.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface no longer holds the range.
    pub fn redo_on(&self, surface: &mut impl TextSurface) -> Result<usize, EditError> {
        let end = self.end_of(self.before_len(), surface)?;
        surface.replace(self.start..end, &self.after)?;
        let cursor = self.start + self.after_len();
        surface.set_cursor(cursor);
        Ok(cursor)
    }

    /// `start + len`, or out of bounds if that overflows.
    fn end_of(&self, len: usize, surface: &impl TextSurface) -> Result<usize, EditError> {
        self.start
            .checked_add(len)
            .ok_or_else(|| EditError::OutOfBounds {
                offset: self.start,
                len: surface.len_chars(),
            })
    }
}

// ---------------------------------------------------------------------------
// EditHistory
// ---------------------------------------------------------------------------

/// The ordered log of [`EditRecord`]s plus a navigation cursor.
///
/// `position` is always within `0..=len`. Everything before it has been
/// applied (can be undone); everything from it onward has been undone (can
/// be redone).
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    records: Vec<EditRecord>,
    position: usize,
}

impl EditHistory {
    /// Create an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            position: 0,
        }
    }

    /// Append a record, discarding the redo tail first if the position is
    /// behind the end. Never fails.
    pub fn add(&mut self, record: EditRecord) {
        if self.position < self.records.len() {
            debug!(
                discarded = self.records.len() - self.position,
                "new edit prunes redo tail"
            );
            self.records.truncate(self.position);
        }
        self.records.push(record);
        self.position = self.records.len();
    }

    /// Step back one record and return it, or `None` when nothing is left to
    /// undo. The caller applies the inverse (see [`EditRecord::undo_on`]).
    pub fn previous(&mut self) -> Option<&EditRecord> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        self.records.get(self.position)
    }

    /// Return the record at the position and step forward, or `None` when
    /// nothing is left to redo. The caller applies it forward (see
    /// [`EditRecord::redo_on`]).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&EditRecord> {
        let record = self.records.get(self.position)?;
        self.position += 1;
        Some(record)
    }

    /// True if [`previous`](Self::previous) would return a record.
    #[inline]
    #[must_use]
    pub const fn is_undo_available(&self) -> bool {
        self.position > 0
    }

    /// True if [`next`](Self::next) would return a record.
    #[inline]
    #[must_use]
    pub fn is_redo_available(&self) -> bool {
        self.position < self.records.len()
    }

    /// How many records are currently applied.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Total number of records, applied or not.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been recorded.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forget every record.
    pub fn clear(&mut self) {
        self.records.clear();
        self.position = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
