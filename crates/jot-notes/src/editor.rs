//! One note open for editing.
//!
//! [`NoteEditor`] ties an [`EditSession`] to the note it was opened from and
//! decides when and where the text is written back: linked notes go to their
//! file, the rest to the store.

use jot_editor::EditSession;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{NotesError, Result};
use crate::export::export_text;
use crate::note::{Note, NoteId};
use crate::store::NoteStore;
use crate::widget::WidgetId;

/// What a call to [`NoteEditor::save`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The text matched what was stored; nothing was written.
    Unchanged,
    /// The note is linked to a file that no longer exists; nothing was
    /// written.
    FileMissing,
    /// The text was written. `refresh` lists the widgets showing the note.
    Saved { refresh: Vec<WidgetId> },
}

impl SaveOutcome {
    #[inline]
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

#[derive(Debug)]
pub struct NoteEditor {
    note: Note,
    session: EditSession,
    autosave: bool,
}

impl NoteEditor {
    /// Open note `id` from `store`, loading its text into a fresh session.
    ///
    /// Loading does not create an undo step. The cursor starts at the
    /// beginning or the end of the text, per `config`.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::NoteNotFound`] for an unknown id and
    /// [`NotesError::NoteFileMissing`] when a linked note's file is gone.
    pub fn open(store: &NoteStore, id: NoteId, config: &Config) -> Result<Self> {
        let note = store.note(id).cloned().ok_or(NotesError::NoteNotFound(id))?;
        let text = note.stored_value()?;

        let mut session = EditSession::new();
        session.populate(&text, config.cursor_placement())?;
        debug!(id, chars = text.chars().count(), "note opened");

        Ok(Self {
            note,
            session,
            autosave: config.autosave_notes,
        })
    }

    #[must_use]
    pub const fn note(&self) -> &Note {
        &self.note
    }

    #[must_use]
    pub const fn session(&self) -> &EditSession {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    /// The text currently in the editor.
    #[must_use]
    pub fn text(&self) -> String {
        self.session.text()
    }

    /// True when the editor text differs from the stored text. A linked note
    /// whose file is gone always counts as unsaved.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.note
            .stored_value()
            .map_or(true, |stored| self.session.has_unsaved_changes(&stored))
    }

    /// Write the editor text back if it changed, or unconditionally with
    /// `force`.
    ///
    /// # Errors
    ///
    /// Returns an error if the linked file or the store cannot be written.
    pub fn save(&mut self, store: &mut NoteStore, force: bool) -> Result<SaveOutcome> {
        if !self.note.file_exists() {
            warn!(id = self.note.id, "note file missing, not saving");
            return Ok(SaveOutcome::FileMissing);
        }

        let text = self.session.text();
        let stored = self.note.stored_value()?;
        if text == stored && !force {
            return Ok(SaveOutcome::Unchanged);
        }

        match &self.note.path {
            Some(path) => export_text(path, &text)?,
            None => store.update_value(self.note.id, &text)?,
        }
        self.note.value = text;
        info!(id = self.note.id, title = %self.note.title, "note saved");

        Ok(SaveOutcome::Saved {
            refresh: store.widgets_for_note(self.note.id),
        })
    }

    /// The editor is being left. Saves when autosave is enabled.
    ///
    /// # Errors
    ///
    /// Same as [`save`](Self::save).
    pub fn pause(&mut self, store: &mut NoteStore) -> Result<SaveOutcome> {
        if self.autosave {
            self.save(store, false)
        } else {
            Ok(SaveOutcome::Unchanged)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
