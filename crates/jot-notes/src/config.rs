//! User preferences, stored as `<data-dir>/config.json`.
//!
//! Every field has a default, so a missing file, an empty object, or a file
//! written by an older version all load cleanly.
//!
//! | Key                   | Default | Effect                                      |
//! |-----------------------|---------|---------------------------------------------|
//! | `autosave_notes`      | true    | save the note when an editing session ends  |
//! | `show_word_count`     | true    | show the word counter beside a note         |
//! | `place_cursor_to_end` | false   | open notes with the cursor after the text   |
//! | `clickable_links`     | false   | highlight URLs and e-mail addresses         |
//! | `widget_note_id`      | 1       | note shown by newly added widgets           |

use std::fs;
use std::io;
use std::path::Path;

use jot_editor::CursorPlacement;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NotesError, Result};
use crate::note::NoteId;
use crate::store::atomic_write;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub autosave_notes: bool,
    pub show_word_count: bool,
    pub place_cursor_to_end: bool,
    pub clickable_links: bool,
    pub widget_note_id: NoteId,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autosave_notes: true,
            show_word_count: true,
            place_cursor_to_end: false,
            clickable_links: false,
            widget_note_id: 1,
        }
    }
}

impl Config {
    /// Load the config from `dir`, falling back to defaults when there is no
    /// config file.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Config`] if the file exists but is not valid,
    /// and [`NotesError::Io`] if it cannot be read.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(NotesError::io(path, err)),
        };
        serde_json::from_str(&text).map_err(|source| NotesError::Config { path, source })
    }

    /// Write the config to `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| NotesError::io(dir, e))?;
        let path = dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| NotesError::Config { path: path.clone(), source })?;
        atomic_write(&path, json.as_bytes())
    }

    /// Where the cursor goes when a note is opened.
    #[must_use]
    pub const fn cursor_placement(&self) -> CursorPlacement {
        if self.place_cursor_to_end {
            CursorPlacement::End
        } else {
            CursorPlacement::Start
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"clickable_links": true}"#).unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.clickable_links);
        assert!(config.autosave_notes);
        assert_eq!(config.widget_note_id, 1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"autosave_notes": "yes"}"#).unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(NotesError::Config { .. })
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            autosave_notes: false,
            place_cursor_to_end: true,
            ..Config::default()
        };
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn cursor_placement_follows_flag() {
        let mut config = Config::default();
        assert_eq!(config.cursor_placement(), CursorPlacement::Start);
        config.place_cursor_to_end = true;
        assert_eq!(config.cursor_placement(), CursorPlacement::End);
    }
}
