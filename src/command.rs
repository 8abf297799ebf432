// SPDX-License-Identifier: MIT
//
// Edit-session commands: one command per input line.
//
//   :i <offset> <text>         insert text at a char offset
//   :d <start> <end>           delete the char range start..end
//   :r <start> <end> <text>    replace the range with text
//   :u  :redo                  undo / redo
//   :p                         print the text and status
//   :w  :q  :q!  :wq           save / quit / discard / save and quit
//
// Text arguments start after exactly one space and may use the escapes
// `\n`, `\t` and `\\`.

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed edit-session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert { offset: usize, text: String },
    Delete { start: usize, end: usize },
    Replace { start: usize, end: usize, text: String },
    Undo,
    Redo,
    Print,
    /// `:w`: save, even when unchanged.
    Write,
    /// `:q`: autosave per config; refuses while changes are unsaved.
    Quit,
    /// `:q!`: leave without saving.
    ForceQuit,
    /// `:wq`: save if changed, then leave. Stays while the text could not
    /// be saved.
    WriteQuit,
    /// Anything unrecognised; holds the input for the error message.
    Unknown(String),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse one input line into a [`Command`].
#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(body) = line.trim_start().strip_prefix(':') else {
        return Command::Unknown(line.to_string());
    };

    let (cmd, rest) = split_word(body);
    let parsed = match cmd {
        "i" => parse_insert(rest),
        "d" => parse_range(rest).and_then(|(start, end, tail)| {
            tail.trim().is_empty().then_some(Command::Delete { start, end })
        }),
        "r" => parse_range(rest).map(|(start, end, tail)| Command::Replace {
            start,
            end,
            text: unescape(tail),
        }),
        "u" | "undo" => no_args(rest, Command::Undo),
        "redo" => no_args(rest, Command::Redo),
        "p" => no_args(rest, Command::Print),
        "w" => no_args(rest, Command::Write),
        "q" => no_args(rest, Command::Quit),
        "q!" => no_args(rest, Command::ForceQuit),
        "wq" | "x" => no_args(rest, Command::WriteQuit),
        _ => None,
    };
    parsed.unwrap_or_else(|| Command::Unknown(line.to_string()))
}

fn parse_insert(rest: &str) -> Option<Command> {
    let (offset, text) = split_word(rest);
    Some(Command::Insert {
        offset: offset.parse().ok()?,
        text: unescape(text),
    })
}

/// `<start> <end> [tail]`, rejecting inverted ranges.
fn parse_range(rest: &str) -> Option<(usize, usize, &str)> {
    let (start, rest) = split_word(rest);
    let (end, tail) = split_word(rest);
    let start: usize = start.parse().ok()?;
    let end: usize = end.parse().ok()?;
    (start <= end).then_some((start, end, tail))
}

fn no_args(rest: &str, cmd: Command) -> Option<Command> {
    rest.trim().is_empty().then_some(cmd)
}

/// Split off the first word. The remainder starts after a single whitespace
/// character, so text arguments keep their own leading spaces.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start_matches(' ');
    input
        .char_indices()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or((input, ""), |(pos, ch)| {
            (&input[..pos], &input[pos + ch.len_utf8()..])
        })
}

/// Expand `\n`, `\t` and `\\`. Other backslashes are kept as written.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_keeps_leading_spaces_of_text() {
        assert_eq!(
            parse_command(":i 3  two spaces"),
            Command::Insert {
                offset: 3,
                text: " two spaces".into()
            }
        );
    }

    #[test]
    fn insert_with_escapes() {
        assert_eq!(
            parse_command(":i 0 a\\nb\\tc\\\\d\n"),
            Command::Insert {
                offset: 0,
                text: "a\nb\tc\\d".into()
            }
        );
    }

    #[test]
    fn insert_empty_text() {
        assert_eq!(
            parse_command(":i 7"),
            Command::Insert {
                offset: 7,
                text: String::new()
            }
        );
    }

    #[test]
    fn delete_and_replace() {
        assert_eq!(
            parse_command(":d 2 5"),
            Command::Delete { start: 2, end: 5 }
        );
        assert_eq!(
            parse_command(":r 0 4 done"),
            Command::Replace {
                start: 0,
                end: 4,
                text: "done".into()
            }
        );
    }

    #[test]
    fn inverted_range_is_unknown() {
        assert_eq!(parse_command(":d 5 2"), Command::Unknown(":d 5 2".into()));
    }

    #[test]
    fn bad_numbers_are_unknown() {
        assert!(matches!(parse_command(":i x hi"), Command::Unknown(_)));
        assert!(matches!(parse_command(":d 1"), Command::Unknown(_)));
        assert!(matches!(parse_command(":d 1 2 3"), Command::Unknown(_)));
    }

    #[test]
    fn bare_commands() {
        assert_eq!(parse_command(":u"), Command::Undo);
        assert_eq!(parse_command(":redo"), Command::Redo);
        assert_eq!(parse_command(":p"), Command::Print);
        assert_eq!(parse_command(":w"), Command::Write);
        assert_eq!(parse_command(":q"), Command::Quit);
        assert_eq!(parse_command(":q!"), Command::ForceQuit);
        assert_eq!(parse_command(":wq\r\n"), Command::WriteQuit);
    }

    #[test]
    fn bare_command_with_arguments_is_unknown() {
        assert_eq!(parse_command(":q now"), Command::Unknown(":q now".into()));
    }

    #[test]
    fn missing_colon_is_unknown() {
        assert_eq!(parse_command("hello"), Command::Unknown("hello".into()));
        assert_eq!(parse_command(""), Command::Unknown(String::new()));
    }

    #[test]
    fn unescape_keeps_unknown_and_trailing_backslashes() {
        assert_eq!(unescape(r"C:\path\"), r"C:\path\");
    }
}
