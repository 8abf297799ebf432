//! Word, character and line counts for the counter shown beside a note.

use unicode_segmentation::UnicodeSegmentation;

/// Counts for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Words per Unicode word segmentation (UAX #29). Punctuation and
    /// whitespace are not words.
    pub words: usize,
    /// Unicode scalar values.
    pub chars: usize,
    /// Lines, counting a trailing partial line. Empty text has 0 lines.
    pub lines: usize,
}

impl TextStats {
    /// Count `text`.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            words: text.unicode_words().count(),
            chars: text.chars().count(),
            lines: text.lines().count(),
        }
    }
}
