//! The note model.
//!
//! A note is a title and a body. The body either lives in the store
//! (`path` is `None`) or in a file on disk that the note is linked to, in
//! which case the file is the source of truth and `value` is only the last
//! copy the store saw.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NotesError, Result};

/// Store-assigned note identifier. Valid ids are positive.
pub type NoteId = u32;

/// What a note holds. Only plain text notes exist today; the tag is stored
/// so that older documents keep loading when more kinds appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub kind: NoteKind,
    /// File the note is linked to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Note {
    /// A new store-backed note. The id is assigned on insert.
    #[must_use]
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            value: value.into(),
            kind: NoteKind::Text,
            path: None,
        }
    }

    /// A new note linked to `path`.
    #[must_use]
    pub fn linked(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(title, "")
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_file_backed(&self) -> bool {
        self.path.is_some()
    }

    /// True for store-backed notes, and for file-backed notes whose file
    /// still exists.
    #[must_use]
    pub fn file_exists(&self) -> bool {
        self.path.as_deref().is_none_or(Path::exists)
    }

    /// The note's current text: the linked file's contents for file-backed
    /// notes, the stored value otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::NoteFileMissing`] if the linked file is gone and
    /// [`NotesError::Io`] if it cannot be read.
    pub fn stored_value(&self) -> Result<String> {
        let Some(path) = &self.path else {
            return Ok(self.value.clone());
        };
        fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => NotesError::NoteFileMissing(path.clone()),
            _ => NotesError::io(path, err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backed_value() {
        let note = Note::new("Groceries", "milk");
        assert!(!note.is_file_backed());
        assert!(note.file_exists());
        assert_eq!(note.stored_value().unwrap(), "milk");
    }

    #[test]
    fn file_backed_value_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.txt");
        fs::write(&path, "from disk").unwrap();

        let mut note = Note::linked("Todo", &path);
        note.value = "stale".into();
        assert!(note.file_exists());
        assert_eq!(note.stored_value().unwrap(), "from disk");
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        let note = Note::linked("Gone", &path);
        assert!(!note.file_exists());
        assert!(matches!(
            note.stored_value(),
            Err(NotesError::NoteFileMissing(p)) if p == path
        ));
    }

    #[test]
    fn serde_defaults_for_older_documents() {
        let note: Note = serde_json::from_str(r#"{"id": 3, "title": "Old"}"#).unwrap();
        assert_eq!(note.value, "");
        assert_eq!(note.kind, NoteKind::Text);
        assert_eq!(note.path, None);
    }

    #[test]
    fn path_omitted_when_unset() {
        let json = serde_json::to_string(&Note::new("A", "b")).unwrap();
        assert!(!json.contains("path"));
        assert!(json.contains(r#""kind":"text""#));
    }
}
