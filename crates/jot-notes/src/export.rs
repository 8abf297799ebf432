//! Exporting a note's text to a file.
//!
//! An export names a directory and a filename. The directory defaults to the
//! folder of the note's linked file, then to the user's documents folder,
//! then to the home directory. The filename is checked before anything is
//! written.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{NotesError, Result};
use crate::note::Note;

/// Characters that may not appear in an exported filename.
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Where to export a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub dir: PathBuf,
    pub filename: String,
}

impl ExportRequest {
    /// An export of `note` into `dir`, or into [`default_dir`] for the note
    /// when `dir` is `None`.
    #[must_use]
    pub fn new(note: &Note, dir: Option<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.unwrap_or_else(|| default_dir(note)),
            filename: filename.into(),
        }
    }

    /// Validate the filename and return the full target path.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::FilenameEmpty`] for a blank filename and
    /// [`NotesError::FilenameInvalid`] for one containing reserved or control
    /// characters (or naming `.`/`..`).
    pub fn target(&self) -> Result<PathBuf> {
        let name = self.filename.trim();
        if name.is_empty() {
            return Err(NotesError::FilenameEmpty);
        }
        if !is_valid_filename(name) {
            return Err(NotesError::FilenameInvalid(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}

/// True if `name` can be used as a single path component.
#[must_use]
pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|ch| RESERVED.contains(&ch) || ch.is_control())
}

/// The directory an export of `note` starts in.
#[must_use]
pub fn default_dir(note: &Note) -> PathBuf {
    note.path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .or_else(dirs::document_dir)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write `text` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn export_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| NotesError::io(parent, e))?;
    }
    fs::write(path, text).map_err(|e| NotesError::io(path, e))?;
    info!(path = %path.display(), "note exported");
    Ok(())
}
