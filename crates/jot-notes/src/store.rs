//! Note store: every note and widget binding in one JSON document.
//!
//! The store lives at `<data-dir>/notes.json`. Each mutating call writes the
//! whole document back atomically (temp file + rename), so a crash never
//! leaves a half-written store behind.
//!
//! # Schema versions
//!
//! | Version | Change                                 |
//! |---------|----------------------------------------|
//! | 1       | notes with id, title, value            |
//! | 2       | note `kind`                            |
//! | 3       | note `path` (file-backed notes)        |
//! | 4       | widget bindings                        |
//! | 5       | explicit `next_note_id` counter        |
//!
//! Older documents load through serde defaults and are rewritten at the
//! current version on open.
//!
//! Titles are unique, compared case-insensitively. Inserting a duplicate
//! title is ignored rather than treated as an error, mirroring an
//! `INSERT OR IGNORE` on a unique column.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{NotesError, Result};
use crate::note::{Note, NoteId};
use crate::widget::{Widget, WidgetId};

/// Current document schema.
pub const SCHEMA_VERSION: u32 = 5;

/// Title of the note created alongside a fresh store.
pub const FIRST_NOTE_TITLE: &str = "General note";

const STORE_FILE: &str = "notes.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    next_note_id: NoteId,
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    widgets: Vec<Widget>,
}

impl Document {
    fn max_note_id(&self) -> NoteId {
        self.notes.iter().map(|n| n.id).max().unwrap_or(0)
    }
}

/// All notes and widgets, persisted as one JSON file.
#[derive(Debug)]
pub struct NoteStore {
    path: PathBuf,
    doc: Document,
}

impl NoteStore {
    // -- Opening ------------------------------------------------------------

    /// Open the store in `dir`, creating the directory and a fresh store
    /// (with one empty [`FIRST_NOTE_TITLE`] note) if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be read or written,
    /// or if the file is not a valid store document.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|e| NotesError::io(dir, e))?;
        let path = dir.join(STORE_FILE);

        if !path.exists() {
            info!(path = %path.display(), "creating note store");
            let mut store = Self {
                path,
                doc: Document {
                    version: SCHEMA_VERSION,
                    next_note_id: 1,
                    ..Document::default()
                },
            };
            store.insert_note(Note::new(FIRST_NOTE_TITLE, ""))?;
            return Ok(store);
        }

        let text = fs::read_to_string(&path).map_err(|e| NotesError::io(&path, e))?;
        let doc: Document = serde_json::from_str(&text).map_err(|source| NotesError::Json {
            path: path.clone(),
            source,
        })?;

        let mut store = Self { path, doc };
        store.upgrade()?;
        Ok(store)
    }

    /// Bring an older document to [`SCHEMA_VERSION`].
    fn upgrade(&mut self) -> Result<()> {
        let floor = self.doc.max_note_id() + 1;
        let stale_counter = self.doc.next_note_id < floor;
        if stale_counter {
            self.doc.next_note_id = floor;
        }
        if self.doc.version < SCHEMA_VERSION {
            info!(
                from = self.doc.version,
                to = SCHEMA_VERSION,
                "upgrading note store"
            );
            self.doc.version = SCHEMA_VERSION;
            return self.save();
        }
        if stale_counter {
            return self.save();
        }
        Ok(())
    }

    /// Where the store document lives.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // -- Notes --------------------------------------------------------------

    /// Insert `note` with a fresh id. Returns `None` (and stores nothing)
    /// when a note with the same title already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn insert_note(&mut self, mut note: Note) -> Result<Option<NoteId>> {
        if self.title_exists(&note.title) {
            debug!(title = %note.title, "insert ignored, title exists");
            return Ok(None);
        }
        let id = self.doc.next_note_id.max(1);
        self.doc.next_note_id = id + 1;
        note.id = id;
        info!(id, title = %note.title, "note inserted");
        self.doc.notes.push(note);
        self.save()?;
        Ok(Some(id))
    }

    /// Delete a note and every widget showing it. Returns `false` if there
    /// was no such note.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn delete_note(&mut self, id: NoteId) -> Result<bool> {
        let before = self.doc.notes.len();
        self.doc.notes.retain(|n| n.id != id);
        if self.doc.notes.len() == before {
            return Ok(false);
        }
        self.doc.widgets.retain(|w| w.note_id != id);
        info!(id, "note deleted");
        self.save()?;
        Ok(true)
    }

    /// True if some note has this title, ignoring case.
    #[must_use]
    pub fn title_exists(&self, title: &str) -> bool {
        self.find_by_title(title).is_some()
    }

    /// All notes sorted by title, ignoring case.
    ///
    /// File-backed notes whose file has disappeared are deleted from the
    /// store as a side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if pruning needs to write the store and cannot.
    pub fn notes(&mut self) -> Result<Vec<Note>> {
        let orphaned: Vec<NoteId> = self
            .doc
            .notes
            .iter()
            .filter(|n| !n.file_exists())
            .map(|n| n.id)
            .collect();
        for id in orphaned {
            warn!(id, "note file missing, removing note");
            self.delete_note(id)?;
        }

        let mut notes = self.doc.notes.clone();
        notes.sort_by_cached_key(|n| n.title.to_lowercase());
        Ok(notes)
    }

    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.doc.notes.iter().find(|n| n.id == id)
    }

    /// The id of the note linked to `path`, if any.
    #[must_use]
    pub fn note_id_by_path(&self, path: &Path) -> Option<NoteId> {
        self.doc
            .notes
            .iter()
            .find(|n| n.path.as_deref() == Some(path))
            .map(|n| n.id)
    }

    /// Look a note up by numeric id or, failing that, by title (ignoring
    /// case).
    #[must_use]
    pub fn resolve(&self, query: &str) -> Option<NoteId> {
        if let Ok(id) = query.parse::<NoteId>() {
            if self.note(id).is_some() {
                return Some(id);
            }
        }
        self.find_by_title(query).map(|n| n.id)
    }

    /// Store a new body for the note.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or the store cannot be
    /// written.
    pub fn update_value(&mut self, id: NoteId, value: &str) -> Result<()> {
        self.note_mut(id)?.value = value.to_string();
        debug!(id, chars = value.chars().count(), "note value updated");
        self.save()
    }

    /// Rename a note.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist, another note already has
    /// the title, or the store cannot be written.
    pub fn update_title(&mut self, id: NoteId, title: &str) -> Result<()> {
        if self.find_by_title(title).is_some_and(|n| n.id != id) {
            return Err(NotesError::TitleExists(title.to_string()));
        }
        self.note_mut(id)?.title = title.to_string();
        info!(id, title, "note renamed");
        self.save()
    }

    /// Link the note to a file, or unlink it with `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or the store cannot be
    /// written.
    pub fn update_path(&mut self, id: NoteId, path: Option<PathBuf>) -> Result<()> {
        self.note_mut(id)?.path = path;
        self.save()
    }

    /// Ids handed out by the store are positive.
    #[inline]
    #[must_use]
    pub const fn is_valid_id(id: NoteId) -> bool {
        id > 0
    }

    fn find_by_title(&self, title: &str) -> Option<&Note> {
        let wanted = title.to_lowercase();
        self.doc
            .notes
            .iter()
            .find(|n| n.title.to_lowercase() == wanted)
    }

    fn note_mut(&mut self, id: NoteId) -> Result<&mut Note> {
        self.doc
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NotesError::NoteNotFound(id))
    }

    // -- Widgets ------------------------------------------------------------

    #[must_use]
    pub fn widgets(&self) -> &[Widget] {
        &self.doc.widgets
    }

    #[must_use]
    pub fn widget(&self, widget_id: WidgetId) -> Option<&Widget> {
        self.doc.widgets.iter().find(|w| w.widget_id == widget_id)
    }

    /// Bind a widget to a note. A widget id that is already bound is
    /// re-pointed at the new note.
    ///
    /// # Errors
    ///
    /// Returns an error if the note does not exist or the store cannot be
    /// written.
    pub fn insert_widget(&mut self, widget: Widget) -> Result<()> {
        if self.note(widget.note_id).is_none() {
            return Err(NotesError::NoteNotFound(widget.note_id));
        }
        match self
            .doc
            .widgets
            .iter_mut()
            .find(|w| w.widget_id == widget.widget_id)
        {
            Some(existing) => existing.note_id = widget.note_id,
            None => self.doc.widgets.push(widget),
        }
        info!(widget = widget.widget_id, note = widget.note_id, "widget bound");
        self.save()
    }

    /// Widgets currently showing `note_id`.
    #[must_use]
    pub fn widgets_for_note(&self, note_id: NoteId) -> Vec<WidgetId> {
        self.doc
            .widgets
            .iter()
            .filter(|w| w.note_id == note_id)
            .map(|w| w.widget_id)
            .collect()
    }

    // -- Persistence --------------------------------------------------------

    /// Write the document to disk atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp file cannot be written or renamed.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.doc).map_err(|source| NotesError::Json {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, json.as_bytes())
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
pub(crate) fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| NotesError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| NotesError::io(path, e))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fresh() -> (TempDir, NoteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn titles(store: &mut NoteStore) -> Vec<String> {
        store.notes().unwrap().into_iter().map(|n| n.title).collect()
    }

    // -- Opening ------------------------------------------------------------

    #[test]
    fn fresh_store_has_first_note() {
        let (_dir, mut store) = fresh();
        let notes = store.notes().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, 1);
        assert_eq!(notes[0].title, FIRST_NOTE_TITLE);
        assert!(store.path().exists());
    }

    #[test]
    fn reopen_keeps_notes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = NoteStore::open(dir.path()).unwrap();
            store.insert_note(Note::new("Ideas", "fly")).unwrap();
        }
        let mut store = NoteStore::open(dir.path()).unwrap();
        assert_eq!(titles(&mut store), [FIRST_NOTE_TITLE, "Ideas"]);
    }

    #[test]
    fn old_document_is_upgraded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(STORE_FILE),
            r#"{"notes": [{"id": 4, "title": "Legacy", "value": "old"}]}"#,
        )
        .unwrap();

        let mut store = NoteStore::open(dir.path()).unwrap();
        let id = store.insert_note(Note::new("New", "")).unwrap();
        assert_eq!(id, Some(5));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains(r#""version": 5"#));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORE_FILE), "not json").unwrap();
        assert!(matches!(
            NoteStore::open(dir.path()),
            Err(NotesError::Json { .. })
        ));
    }

    // -- Notes --------------------------------------------------------------

    #[test]
    fn duplicate_title_is_ignored_case_insensitively() {
        let (_dir, mut store) = fresh();
        assert_eq!(store.insert_note(Note::new("Work", "")).unwrap(), Some(2));
        assert_eq!(store.insert_note(Note::new("WORK", "")).unwrap(), None);
        assert!(store.title_exists("work"));
        assert_eq!(store.notes().unwrap().len(), 2);
    }

    #[test]
    fn notes_sorted_by_title_ignoring_case() {
        let (_dir, mut store) = fresh();
        store.insert_note(Note::new("banana", "")).unwrap();
        store.insert_note(Note::new("Apple", "")).unwrap();
        store.insert_note(Note::new("cherry", "")).unwrap();
        assert_eq!(
            titles(&mut store),
            ["Apple", "banana", "cherry", FIRST_NOTE_TITLE]
        );
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, mut store) = fresh();
        let a = store.insert_note(Note::new("A", "")).unwrap().unwrap();
        assert!(store.delete_note(a).unwrap());
        let b = store.insert_note(Note::new("B", "")).unwrap().unwrap();
        assert!(b > a);
    }

    #[test]
    fn delete_missing_note_is_false() {
        let (_dir, mut store) = fresh();
        assert!(!store.delete_note(99).unwrap());
    }

    #[test]
    fn delete_removes_widgets() {
        let (_dir, mut store) = fresh();
        let id = store.insert_note(Note::new("Shown", "")).unwrap().unwrap();
        store.insert_widget(Widget::new(10, id)).unwrap();
        store.insert_widget(Widget::new(11, 1)).unwrap();

        store.delete_note(id).unwrap();
        assert_eq!(store.widgets(), [Widget::new(11, 1)]);
    }

    #[test]
    fn listing_prunes_notes_with_missing_files() {
        let (dir, mut store) = fresh();
        let file = dir.path().join("linked.txt");
        fs::write(&file, "x").unwrap();
        let id = store
            .insert_note(Note::linked("Linked", &file))
            .unwrap()
            .unwrap();
        assert_eq!(store.notes().unwrap().len(), 2);

        fs::remove_file(&file).unwrap();
        assert_eq!(titles(&mut store), [FIRST_NOTE_TITLE]);
        assert!(store.note(id).is_none());
    }

    #[test]
    fn note_id_by_path() {
        let (dir, mut store) = fresh();
        let file = dir.path().join("a.md");
        fs::write(&file, "").unwrap();
        let id = store.insert_note(Note::linked("A", &file)).unwrap().unwrap();
        assert_eq!(store.note_id_by_path(&file), Some(id));
        assert_eq!(store.note_id_by_path(&dir.path().join("b.md")), None);
    }

    #[test]
    fn resolve_by_id_or_title() {
        let (_dir, mut store) = fresh();
        let id = store.insert_note(Note::new("Shopping", "")).unwrap().unwrap();
        assert_eq!(store.resolve(&id.to_string()), Some(id));
        assert_eq!(store.resolve("shopping"), Some(id));
        assert_eq!(store.resolve("nope"), None);
    }

    #[test]
    fn resolve_numeric_title() {
        let (_dir, mut store) = fresh();
        let id = store.insert_note(Note::new("2024", "")).unwrap().unwrap();
        assert_eq!(store.resolve("2024"), Some(id));
    }

    #[test]
    fn update_value_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = NoteStore::open(dir.path()).unwrap();
            store.update_value(1, "remember").unwrap();
        }
        let store = NoteStore::open(dir.path()).unwrap();
        assert_eq!(store.note(1).unwrap().value, "remember");
    }

    #[test]
    fn update_missing_note_fails() {
        let (_dir, mut store) = fresh();
        assert!(matches!(
            store.update_value(42, "x"),
            Err(NotesError::NoteNotFound(42))
        ));
    }

    #[test]
    fn rename_rejects_taken_title() {
        let (_dir, mut store) = fresh();
        let id = store.insert_note(Note::new("Mine", "")).unwrap().unwrap();
        assert!(matches!(
            store.update_title(id, "general NOTE"),
            Err(NotesError::TitleExists(_))
        ));
        // Changing only the case of a note's own title is allowed.
        store.update_title(id, "MINE").unwrap();
        assert_eq!(store.note(id).unwrap().title, "MINE");
    }

    #[test]
    fn update_path_links_and_unlinks() {
        let (dir, mut store) = fresh();
        let file = dir.path().join("n.txt");
        store.update_path(1, Some(file.clone())).unwrap();
        assert_eq!(store.note(1).unwrap().path.as_deref(), Some(file.as_path()));
        store.update_path(1, None).unwrap();
        assert!(!store.note(1).unwrap().is_file_backed());
    }

    #[test]
    fn valid_ids_are_positive() {
        assert!(!NoteStore::is_valid_id(0));
        assert!(NoteStore::is_valid_id(1));
    }

    // -- Widgets ------------------------------------------------------------

    #[test]
    fn widget_rebinding() {
        let (_dir, mut store) = fresh();
        let id = store.insert_note(Note::new("Other", "")).unwrap().unwrap();
        store.insert_widget(Widget::new(7, 1)).unwrap();
        store.insert_widget(Widget::new(7, id)).unwrap();
        assert_eq!(store.widgets().len(), 1);
        assert_eq!(store.widget(7).unwrap().note_id, id);
        assert_eq!(store.widgets_for_note(id), [7]);
        assert!(store.widgets_for_note(1).is_empty());
    }

    #[test]
    fn widget_for_missing_note_fails() {
        let (_dir, mut store) = fresh();
        assert!(matches!(
            store.insert_widget(Widget::new(1, 99)),
            Err(NotesError::NoteNotFound(99))
        ));
    }
}
