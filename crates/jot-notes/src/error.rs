//! Errors for note storage, export and configuration.

use std::io;
use std::path::PathBuf;

use jot_editor::EditError;
use thiserror::Error;

use crate::note::NoteId;

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed note store {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no note with id {0}")]
    NoteNotFound(NoteId),

    #[error("note file {} no longer exists", .0.display())]
    NoteFileMissing(PathBuf),

    #[error("a note titled \"{0}\" already exists")]
    TitleExists(String),

    #[error("filename cannot be empty")]
    FilenameEmpty,

    #[error("filename \"{0}\" contains invalid characters")]
    FilenameInvalid(String),

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl NotesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = NotesError> = std::result::Result<T, E>;
