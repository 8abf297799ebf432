//! # jot-editor: Editing core for jot
//!
//! This crate contains everything that happens while a note is open:
//!
//! - **[`buffer`]**: `Buffer` wrapping a rope with checked, char-offset edits
//! - **[`history`]**: `EditRecord` and `EditHistory`, the linear undo/redo log
//! - **[`surface`]**: the `TextSurface` seam and the `TextField` implementation
//! - **[`session`]**: `EditSession`, which records user edits and applies
//!   undo/redo without re-recording them
//! - **[`stats`]**: word/char/line counts for the note counter
//! - **[`position`]**: display (line, col) coordinates

pub mod buffer;
pub mod error;
pub mod history;
pub mod position;
pub mod session;
pub mod stats;
pub mod surface;

pub use error::EditError;
pub use history::{EditHistory, EditRecord};
pub use session::{CursorPlacement, EditSession, SessionStatus};
pub use stats::TextStats;
pub use surface::{TextField, TextSurface};
