// SPDX-License-Identifier: MIT
//
// jot: a plain-text note keeper with per-session undo/redo.
//
// This is the binary that wires the two crates together:
//
//   jot-editor → rope buffer, edit history, editing sessions
//   jot-notes  → note store, editor orchestration, export, markdown, widgets
//
// Every subcommand opens the store in the data directory, does one thing,
// and exits. `jot edit` is the only long-running command: it reads edit
// commands from stdin until a quit command or end of input.
//
//   --data-dir / $JOT_DATA_DIR / <platform data dir>/jot
//     ├── notes.json    notes and widget bindings
//     └── config.json   preferences

mod command;
mod edit;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Parser, Subcommand};
use jot_editor::TextStats;
use jot_notes::export::export_text;
use jot_notes::links::highlight_links;
use jot_notes::markdown::{Attr, write_sgr};
use jot_notes::{
    Config, ExportRequest, Note, NoteEditor, NoteId, NoteStore, Widget, WidgetId, WidgetPreview,
    render_markdown,
};
use tracing_subscriber::EnvFilter;

// ─── Arguments ──────────────────────────────────────────────────────────────

/// A plain-text note keeper.
#[derive(Parser, Debug)]
#[command(name = "jot", version, about, long_about = None)]
struct Cli {
    /// Directory holding notes.json and config.json
    #[arg(long, env = "JOT_DATA_DIR", value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). JOT_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List notes sorted by title
    List,
    /// Create a note
    New {
        title: String,
        /// Initial text
        #[arg(long)]
        text: Option<String>,
    },
    /// Print a note
    Show {
        /// Note id or title
        note: String,
        /// Render the text as markdown
        #[arg(long)]
        markdown: bool,
        /// No colors, highlighting or word count
        #[arg(long)]
        plain: bool,
    },
    /// Edit a note with commands read from stdin
    Edit {
        /// Note id or title
        note: String,
    },
    /// Change a note's title
    Rename { note: String, title: String },
    /// Delete a note and the widgets showing it
    Delete { note: String },
    /// Write a note's text to a file
    Export {
        note: String,
        filename: String,
        /// Target directory (default: the note's folder, then documents, then home)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Link the note to the exported file afterwards
        #[arg(long)]
        link: bool,
    },
    /// Manage widgets
    Widget {
        #[command(subcommand)]
        action: WidgetCmd,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
enum WidgetCmd {
    /// Bind a widget to a note (default: the configured widget note)
    Add {
        widget_id: WidgetId,
        note: Option<String>,
    },
    /// Render what a widget displays
    Show {
        widget_id: WidgetId,
        #[arg(long, default_value_t = 32)]
        width: usize,
        #[arg(long, default_value_t = 8)]
        lines: usize,
    },
    /// List widget bindings
    List,
}

// ─── Setup ──────────────────────────────────────────────────────────────────

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("JOT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    flag.or_else(|| dirs::data_dir().map(|d| d.join("jot")))
        .context("no data directory found; pass --data-dir or set JOT_DATA_DIR")
}

fn resolve(store: &NoteStore, query: &str) -> Result<NoteId> {
    store
        .resolve(query)
        .ok_or_else(|| anyhow!("no note with id or title {query:?}"))
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn run(cli: Cli) -> Result<()> {
    let dir = data_dir(cli.data_dir)?;
    let config = Config::load(&dir).context("failed to load config")?;
    let mut store = NoteStore::open(&dir)
        .with_context(|| format!("failed to open note store in {}", dir.display()))?;

    match cli.command {
        Cmd::List => {
            for note in store.notes()? {
                println!("{}", list_row(&note));
            }
        }
        Cmd::New { title, text } => {
            let note = Note::new(title.trim(), text.unwrap_or_default());
            let Some(id) = store.insert_note(note)? else {
                bail!("a note titled {title:?} already exists");
            };
            println!("{id}");
        }
        Cmd::Show {
            note,
            markdown,
            plain,
        } => {
            let id = resolve(&store, &note)?;
            show(&store, id, &config, markdown, plain)?;
        }
        Cmd::Edit { note } => {
            let id = resolve(&store, &note)?;
            let mut editor = NoteEditor::open(&store, id, &config)
                .with_context(|| format!("failed to open note {note:?}"))?;
            let stdin = io::stdin().lock();
            let mut stdout = io::stdout().lock();
            edit::run(&mut editor, &mut store, stdin, &mut stdout)?;
        }
        Cmd::Rename { note, title } => {
            let id = resolve(&store, &note)?;
            store.update_title(id, title.trim())?;
        }
        Cmd::Delete { note } => {
            let id = resolve(&store, &note)?;
            store.delete_note(id)?;
        }
        Cmd::Export {
            note,
            filename,
            dir,
            link,
        } => {
            let id = resolve(&store, &note)?;
            let path = export(&mut store, id, dir, &filename, link)?;
            println!("{}", path.display());
        }
        Cmd::Widget { action } => widget(&mut store, &config, action)?,
        Cmd::Config => {
            println!("# {}", dir.join("config.json").display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn list_row(note: &Note) -> String {
    let text = note.stored_value().unwrap_or_else(|_| note.value.clone());
    let marker = if note.is_file_backed() { " [file]" } else { "" };
    format!(
        "{:>4}  {}{marker}  ({} words)",
        note.id,
        note.title,
        TextStats::of(&text).words
    )
}

fn show(store: &NoteStore, id: NoteId, config: &Config, markdown: bool, plain: bool) -> Result<()> {
    let note = store.note(id).context("note disappeared")?;
    let text = note.stored_value()?;
    let styled = !plain && io::stdout().is_terminal();

    let body = if markdown {
        render_markdown(&text, styled)
    } else if styled && config.clickable_links {
        let mut open = String::new();
        write_sgr(&mut open, Attr::UNDERLINE);
        highlight_links(&text, &open, "\x1b[0m")
    } else {
        text.clone()
    };
    println!("{body}");

    if config.show_word_count && !plain {
        println!("\n({} words)", TextStats::of(&text).words);
    }
    Ok(())
}

fn export(
    store: &mut NoteStore,
    id: NoteId,
    dir: Option<PathBuf>,
    filename: &str,
    link: bool,
) -> Result<PathBuf> {
    let note = store.note(id).context("note disappeared")?;
    let text = note.stored_value()?;
    let target = ExportRequest::new(note, dir, filename).target()?;

    export_text(&target, &text)?;
    if link {
        store.update_path(id, Some(target.clone()))?;
    }
    Ok(target)
}

fn widget(store: &mut NoteStore, config: &Config, action: WidgetCmd) -> Result<()> {
    match action {
        WidgetCmd::Add { widget_id, note } => {
            let id = match note {
                Some(query) => resolve(store, &query)?,
                None => config.widget_note_id,
            };
            store.insert_widget(Widget::new(widget_id, id))?;
        }
        WidgetCmd::Show {
            widget_id,
            width,
            lines,
        } => {
            let binding = store
                .widget(widget_id)
                .with_context(|| format!("no widget {widget_id}"))?;
            let note = store
                .note(binding.note_id)
                .with_context(|| format!("widget {widget_id} shows a deleted note"))?;
            let body = note.stored_value()?;
            for line in WidgetPreview::render(note, &body, width, lines).lines {
                println!("{line}");
            }
        }
        WidgetCmd::List => {
            for w in store.widgets() {
                let title = store.note(w.note_id).map_or("?", |n| n.title.as_str());
                println!("{:>4}  → {}  {title}", w.widget_id, w.note_id);
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("jot: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    fn open(dir: &Path) -> NoteStore {
        NoteStore::open(dir).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_export_flags() {
        let cli = Cli::try_parse_from([
            "jot", "--data-dir", "/tmp/j", "export", "Todo", "todo.txt", "--dir", "/out", "--link",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/j")));
        assert!(matches!(
            cli.command,
            Cmd::Export { ref note, link: true, .. } if note == "Todo"
        ));
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["jot", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn explicit_data_dir_wins() {
        assert_eq!(
            data_dir(Some(PathBuf::from("/x"))).unwrap(),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn resolve_reports_unknown_note() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(dir.path());
        assert_eq!(resolve(&store, "general note").unwrap(), 1);
        let err = resolve(&store, "missing").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn list_row_marks_linked_notes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.txt");
        fs::write(&path, "two words").unwrap();
        let mut note = Note::linked("Linked", &path);
        note.id = 12;
        assert_eq!(list_row(&note), "  12  Linked [file]  (2 words)");
    }

    #[test]
    fn export_and_link() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        store.update_value(1, "exported text").unwrap();

        let out = dir.path().join("out");
        let path = export(&mut store, 1, Some(out.clone()), "note.txt", true).unwrap();
        assert_eq!(path, out.join("note.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "exported text");
        assert_eq!(store.note(1).unwrap().path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn export_rejects_bad_filename() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        assert!(export(&mut store, 1, Some(dir.path().to_path_buf()), "", false).is_err());
        assert!(export(&mut store, 1, Some(dir.path().to_path_buf()), "a/b", false).is_err());
    }

    #[test]
    fn widget_add_defaults_to_configured_note() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open(dir.path());
        let action = WidgetCmd::Add {
            widget_id: 5,
            note: None,
        };
        widget(&mut store, &Config::default(), action).unwrap();
        assert_eq!(store.widget(5).unwrap().note_id, 1);
    }
}
