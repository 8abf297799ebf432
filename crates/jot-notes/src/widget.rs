//! Home-screen style widgets: a widget shows one note's text.
//!
//! The store keeps the widget → note mapping; [`WidgetPreview`] renders what
//! a widget of a given size displays.

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::note::{Note, NoteId};

pub type WidgetId = u32;

/// A widget bound to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub widget_id: WidgetId,
    pub note_id: NoteId,
}

impl Widget {
    #[must_use]
    pub const fn new(widget_id: WidgetId, note_id: NoteId) -> Self {
        Self { widget_id, note_id }
    }
}

/// The text a widget displays: the note title followed by as many body lines
/// as fit, each cut to the widget width in terminal columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetPreview {
    pub lines: Vec<String>,
}

impl WidgetPreview {
    /// Render `note`'s title and `body` into at most `height` lines of at most
    /// `width` columns. Lines that do not fit end in `…`; a body with more
    /// lines than fit ends in a `…` line.
    #[must_use]
    pub fn render(note: &Note, body: &str, width: usize, height: usize) -> Self {
        let mut lines = Vec::with_capacity(height);
        if height == 0 || width == 0 {
            return Self { lines };
        }

        lines.push(truncate_to_width(&note.title, width));

        let body_rows = height - 1;
        let body_lines: Vec<&str> = body.lines().collect();
        let overflow = body_lines.len() > body_rows;
        let shown = if overflow {
            body_rows.saturating_sub(1)
        } else {
            body_lines.len()
        };

        lines.extend(
            body_lines[..shown]
                .iter()
                .map(|line| truncate_to_width(line, width)),
        );
        if overflow && body_rows > 0 {
            lines.push("…".to_string());
        }

        Self { lines }
    }
}

/// Cut `text` to at most `width` display columns, replacing the tail with
/// `…` when it does not fit. Wide characters are never split.
#[must_use]
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let room = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > room {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
