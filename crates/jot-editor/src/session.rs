//! Editing sessions: one note open for editing, with its undo/redo history.
//!
//! An [`EditSession`] owns a [`TextSurface`], an [`EditHistory`] and a
//! suppression flag. It is created when a note is opened and dropped when
//! the note is closed; the history is never persisted, only the final text.
//!
//! # Change notifications
//!
//! Every mutation of the surface made through the session produces a change
//! notification, exactly like a text widget firing its watcher: the offset,
//! the removed fragment and the inserted fragment. The notification lands in
//! [`EditSession::text_changed`], which records it as an [`EditRecord`].
//!
//! Some mutations are mechanical rather than user-driven: applying an undo
//! or redo, or populating the surface with a note's stored text. Those run
//! inside a [`Suppress`] scope. The guard raises the flag on entry and
//! restores it on drop, so every exit path (including a failed replace)
//! leaves the session recording again.
//!
//! ```text
//! user edit ──► surface.replace ──► text_changed ──► history.add
//! undo      ──► Suppress ──► record.undo_on ──► text_changed (dropped)
//! ```

use std::cell::Cell;
use std::ops::Range;

use tracing::debug;

use crate::error::EditError;
use crate::history::{EditHistory, EditRecord};
use crate::position::Position;
use crate::stats::TextStats;
use crate::surface::{TextField, TextSurface};

// ---------------------------------------------------------------------------
// Suppression guard
// ---------------------------------------------------------------------------

/// Scoped suppression of change recording.
///
/// Restores the flag's previous value on drop, so nested scopes unwind
/// correctly.
struct Suppress<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> Suppress<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for Suppress<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

/// Record a change notification unless recording is suppressed.
fn notify(history: &mut EditHistory, programmatic: &Cell<bool>, record: EditRecord) {
    if programmatic.get() {
        debug!(start = record.start, "programmatic change not recorded");
        return;
    }
    if record.is_noop() {
        return;
    }
    history.add(record);
}

/// A surface whose replacements fire change notifications into a history.
struct Watched<'a, S> {
    surface: &'a mut S,
    history: &'a mut EditHistory,
    programmatic: &'a Cell<bool>,
}

impl<S: TextSurface> TextSurface for Watched<'_, S> {
    fn len_chars(&self) -> usize {
        self.surface.len_chars()
    }

    fn contents(&self) -> String {
        self.surface.contents()
    }

    fn slice(&self, range: Range<usize>) -> Result<String, EditError> {
        self.surface.slice(range)
    }

    fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        let removed = self.surface.slice(range.clone())?;
        self.surface.replace(range.clone(), text)?;
        notify(
            self.history,
            self.programmatic,
            EditRecord::new(range.start, removed, text),
        );
        Ok(())
    }

    fn cursor(&self) -> usize {
        self.surface.cursor()
    }

    fn set_cursor(&mut self, offset: usize) {
        self.surface.set_cursor(offset);
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Where the cursor lands after the surface is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPlacement {
    #[default]
    Start,
    End,
}

/// A snapshot of what the note view shows beside the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub stats: TextStats,
    pub cursor: usize,
}

/// One note being edited.
#[derive(Debug)]
pub struct EditSession<S: TextSurface = TextField> {
    surface: S,
    history: EditHistory,
    programmatic: Cell<bool>,
}

impl<S: TextSurface> EditSession<S> {
    /// Start a session over `surface` with an empty history.
    #[must_use]
    pub fn open(surface: S) -> Self {
        Self {
            surface,
            history: EditHistory::new(),
            programmatic: Cell::new(false),
        }
    }

    /// Replace the whole text without recording it, then place the cursor.
    /// Used for initial population and for restoring saved view state.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the surface to accept the text.
    pub fn populate(&mut self, text: &str, placement: CursorPlacement) -> Result<(), EditError> {
        let _quiet = Suppress::engage(&self.programmatic);
        let mut watched = Watched {
            surface: &mut self.surface,
            history: &mut self.history,
            programmatic: &self.programmatic,
        };
        let len = watched.len_chars();
        watched.replace(0..len, text)?;
        let cursor = match placement {
            CursorPlacement::Start => 0,
            CursorPlacement::End => watched.len_chars(),
        };
        watched.set_cursor(cursor);
        Ok(())
    }

    /// Change notification from the surface: `before` was replaced by
    /// `after` at `start`. Recorded unless a programmatic change is being
    /// applied. Widget bindings that mutate the text themselves forward their
    /// watcher callbacks here.
    pub fn text_changed(&mut self, start: usize, before: &str, after: &str) {
        notify(
            &mut self.history,
            &self.programmatic,
            EditRecord::new(start, before, after),
        );
    }

    // -- User edits ---------------------------------------------------------

    /// Replace `range` with `text` as a user edit. The cursor moves to the
    /// end of the inserted text.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is not inside the text; nothing is
    /// recorded in that case.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EditError> {
        let start = range.start;
        let mut watched = Watched {
            surface: &mut self.surface,
            history: &mut self.history,
            programmatic: &self.programmatic,
        };
        watched.replace(range, text)?;
        watched.set_cursor(start + text.chars().count());
        Ok(())
    }

    /// Insert `text` at `offset` as a user edit.
    ///
    /// # Errors
    ///
    /// Returns an error if `offset` is past the end.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.replace(offset..offset, text)
    }

    /// Delete `range` as a user edit.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is not inside the text.
    pub fn delete(&mut self, range: Range<usize>) -> Result<(), EditError> {
        self.replace(range, "")
    }

    // -- Undo / redo --------------------------------------------------------

    /// Undo the most recent applied edit. Returns `false` when there is
    /// nothing to undo.
    ///
    /// # Errors
    ///
    /// Returns an error if the record no longer fits the text. The history
    /// position is left where it was before the call.
    pub fn undo(&mut self) -> Result<bool, EditError> {
        let Some(record) = self.history.previous().cloned() else {
            return Ok(false);
        };
        let result = {
            let _quiet = Suppress::engage(&self.programmatic);
            let mut watched = Watched {
                surface: &mut self.surface,
                history: &mut self.history,
                programmatic: &self.programmatic,
            };
            record.undo_on(&mut watched)
        };
        match result {
            Ok(cursor) => {
                debug!(position = self.history.position(), cursor, "undo");
                Ok(true)
            }
            Err(err) => {
                self.history.next();
                Err(err)
            }
        }
    }

    /// Redo the most recently undone edit. Returns `false` when there is
    /// nothing to redo.
    ///
    /// # Errors
    ///
    /// Returns an error if the record no longer fits the text. The history
    /// position is left where it was before the call.
    pub fn redo(&mut self) -> Result<bool, EditError> {
        let Some(record) = self.history.next().cloned() else {
            return Ok(false);
        };
        let result = {
            let _quiet = Suppress::engage(&self.programmatic);
            let mut watched = Watched {
                surface: &mut self.surface,
                history: &mut self.history,
                programmatic: &self.programmatic,
            };
            record.redo_on(&mut watched)
        };
        match result {
            Ok(cursor) => {
                debug!(position = self.history.position(), cursor, "redo");
                Ok(true)
            }
            Err(err) => {
                self.history.previous();
                Err(err)
            }
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_undo_available(&self) -> bool {
        self.history.is_undo_available()
    }

    #[inline]
    #[must_use]
    pub fn is_redo_available(&self) -> bool {
        self.history.is_redo_available()
    }

    // -- Accessors ----------------------------------------------------------

    /// The current text.
    #[must_use]
    pub fn text(&self) -> String {
        self.surface.contents()
    }

    /// The cursor offset.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.surface.cursor()
    }

    #[must_use]
    pub const fn history(&self) -> &EditHistory {
        &self.history
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Undo/redo availability, counts and cursor, for the view to show
    /// after each change.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            can_undo: self.is_undo_available(),
            can_redo: self.is_redo_available(),
            stats: TextStats::of(&self.text()),
            cursor: self.cursor(),
        }
    }

    /// True when the text differs from what is stored for the note.
    #[must_use]
    pub fn has_unsaved_changes(&self, stored: &str) -> bool {
        self.text() != stored
    }

    /// End the session, returning the final text. The history is dropped.
    #[must_use]
    pub fn close(self) -> String {
        debug!(records = self.history.len(), "session closed");
        self.surface.contents()
    }
}

impl EditSession<TextField> {
    /// A session over a fresh, empty [`TextField`].
    #[must_use]
    pub fn new() -> Self {
        Self::open(TextField::new())
    }

    /// The cursor as a display position.
    #[must_use]
    pub fn cursor_position(&self) -> Position {
        self.surface.cursor_position()
    }
}

impl Default for EditSession<TextField> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
