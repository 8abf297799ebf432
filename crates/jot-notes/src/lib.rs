//! # jot-notes: Notes, storage and presentation for jot
//!
//! - **[`note`]**: the `Note` model, store-backed or linked to a file
//! - **[`store`]**: `NoteStore`, the versioned JSON document holding notes
//!   and widget bindings
//! - **[`editor`]**: `NoteEditor`, an open note with save and autosave rules
//! - **[`export`]**: filename validation and writing a note out
//! - **[`markdown`]**: markdown rendering for the terminal
//! - **[`links`]**: URL and e-mail detection
//! - **[`widget`]**: widget bindings and their text preview
//! - **[`config`]**: user preferences

pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod links;
pub mod markdown;
pub mod note;
pub mod store;
pub mod widget;

pub use config::Config;
pub use editor::{NoteEditor, SaveOutcome};
pub use error::{NotesError, Result};
pub use export::ExportRequest;
pub use markdown::render_markdown;
pub use note::{Note, NoteId, NoteKind};
pub use store::NoteStore;
pub use widget::{Widget, WidgetId, WidgetPreview};
