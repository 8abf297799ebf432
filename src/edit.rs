// SPDX-License-Identifier: MIT
//
// The `jot edit` loop: read commands line by line, apply them to an open
// note, and report back.
//
//   input line → parse_command → NoteEditor / EditSession → output
//
// Edit errors (an offset past the end, say) are reported and the loop goes
// on. Only I/O and store failures end the session early.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use jot_notes::{NoteEditor, NoteStore, SaveOutcome};
use tracing::info;

use crate::command::{Command, parse_command};

/// How an edit session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Left normally; the text was saved or unchanged.
    Quit,
    /// Left with `:q!`; unsaved changes were dropped.
    Discarded,
    /// Input ran out. Autosave applied per config.
    EndOfInput,
}

/// Run commands from `input` against `editor` until a quit command or the
/// end of input.
///
/// # Errors
///
/// Returns an error if input or output fails, or if a save cannot write the
/// store or the note's file.
pub fn run<R: BufRead, W: Write>(
    editor: &mut NoteEditor,
    store: &mut NoteStore,
    input: R,
    out: &mut W,
) -> Result<Exit> {
    for line in input.lines() {
        let line = line.context("failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Insert { offset, text } => {
                report(out, editor.session_mut().insert(offset, &text))?;
            }
            Command::Delete { start, end } => {
                report(out, editor.session_mut().delete(start..end))?;
            }
            Command::Replace { start, end, text } => {
                report(out, editor.session_mut().replace(start..end, &text))?;
            }
            Command::Undo => {
                let undone = editor.session_mut().undo();
                if matches!(undone, Ok(false)) {
                    writeln!(out, "nothing to undo")?;
                }
                report(out, undone)?;
            }
            Command::Redo => {
                let redone = editor.session_mut().redo();
                if matches!(redone, Ok(false)) {
                    writeln!(out, "nothing to redo")?;
                }
                report(out, redone)?;
            }
            Command::Print => print(editor, out)?,
            Command::Write => {
                let outcome = editor.save(store, true)?;
                announce(out, &outcome)?;
            }
            Command::Quit => {
                let outcome = editor.pause(store)?;
                announce(out, &outcome)?;
                if editor.has_unsaved_changes() {
                    writeln!(out, "unsaved changes (:wq to save, :q! to discard)")?;
                    continue;
                }
                return Ok(Exit::Quit);
            }
            Command::ForceQuit => return Ok(Exit::Discarded),
            Command::WriteQuit => {
                let outcome = editor.save(store, false)?;
                announce(out, &outcome)?;
                if editor.has_unsaved_changes() {
                    writeln!(out, "unsaved changes (:wq to save, :q! to discard)")?;
                    continue;
                }
                return Ok(Exit::Quit);
            }
            Command::Unknown(input) => writeln!(out, "unknown command: {input}")?,
        }
    }

    let outcome = editor.pause(store)?;
    announce(out, &outcome)?;
    Ok(Exit::EndOfInput)
}

fn report<T, E: std::fmt::Display>(out: &mut impl Write, result: Result<T, E>) -> Result<()> {
    if let Err(err) = result {
        writeln!(out, "error: {err}")?;
    }
    Ok(())
}

fn announce(out: &mut impl Write, outcome: &SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Unchanged => {}
        SaveOutcome::FileMissing => writeln!(out, "note file is missing, not saved")?,
        SaveOutcome::Saved { refresh } => {
            writeln!(out, "saved")?;
            if !refresh.is_empty() {
                info!(widgets = ?refresh, "widgets showing the note need a refresh");
            }
        }
    }
    Ok(())
}

fn print(editor: &NoteEditor, out: &mut impl Write) -> Result<()> {
    let status = editor.session().status();
    writeln!(out, "{}", editor.text())?;
    writeln!(
        out,
        "-- {} words, {} chars, cursor {}{}{}",
        status.stats.words,
        status.stats.chars,
        editor.session().cursor_position(),
        if status.can_undo { ", undo" } else { "" },
        if status.can_redo { ", redo" } else { "" },
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
