//! Errors raised while mutating a text surface.

use thiserror::Error;

/// A buffer mutation that could not be applied.
///
/// History navigation itself never fails; these only surface when a record
/// (or a user edit) names offsets the live text no longer has.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// An offset lies past the end of the text.
    #[error("offset {offset} is out of bounds (text has {len} chars)")]
    OutOfBounds { offset: usize, len: usize },

    /// A range whose start comes after its end.
    #[error("range start {start} is after its end {end}")]
    InvertedRange { start: usize, end: usize },
}
