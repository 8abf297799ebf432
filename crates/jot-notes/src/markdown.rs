//! Markdown rendering for terminal display.
//!
//! Parsing is delegated to `pulldown-cmark`; this module only walks its event
//! stream and lays the text out for a terminal. Styled output marks emphasis,
//! headings, code and links with SGR attributes; plain output is the same
//! layout without escape sequences, for pipes and files.
//!
//! | Markdown         | Styled                  | Plain                 |
//! |------------------|-------------------------|-----------------------|
//! | `# Title`        | bold + underline        | `Title` over `=====`  |
//! | `## Section`     | bold                    | `Section` over `---`  |
//! | `*em*`, `**st**` | italic, bold            | text                  |
//! | `` `code` ``     | inverse                 | text                  |
//! | code block       | dim, indented 4         | indented 4            |
//! | `[t](url)`       | underlined, `<url>`     | `t <url>`             |
//! | `- item`         | `• item`                | `• item`              |
//! | `> quote`        | `│ quote`               | `│ quote`             |

use std::fmt::Write as _;

use bitflags::bitflags;
use pulldown_cmark::{Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};
use unicode_width::UnicodeWidthStr;

bitflags! {
    /// Text attributes, mapped to SGR parameters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD          = 1 << 0;
        /// SGR 2.
        const DIM           = 1 << 1;
        /// SGR 3.
        const ITALIC        = 1 << 2;
        /// SGR 4.
        const UNDERLINE     = 1 << 3;
        /// SGR 7.
        const INVERSE       = 1 << 4;
        /// SGR 9.
        const STRIKETHROUGH = 1 << 5;
    }
}

const RESET: &str = "\x1b[0m";
const RULE_WIDTH: usize = 24;

/// Append the SGR sequence for `attr` to `out`. Nothing for empty attrs.
pub fn write_sgr(out: &mut String, attr: Attr) {
    if attr.is_empty() {
        return;
    }

    out.push_str("\x1b[");
    let mut first = true;

    macro_rules! emit {
        ($flag:expr, $code:expr) => {
            if attr.contains($flag) {
                if !first {
                    out.push(';');
                }
                out.push_str($code);
                first = false;
            }
        };
    }

    emit!(Attr::BOLD, "1");
    emit!(Attr::DIM, "2");
    emit!(Attr::ITALIC, "3");
    emit!(Attr::UNDERLINE, "4");
    emit!(Attr::INVERSE, "7");
    emit!(Attr::STRIKETHROUGH, "9");
    let _ = first;

    out.push('m');
}

/// Render markdown `source` for a terminal. `styled` selects SGR output.
#[must_use]
pub fn render_markdown(source: &str, styled: bool) -> String {
    let options = Options::ENABLE_STRIKETHROUGH;
    let mut renderer = Renderer::new(styled);
    for event in Parser::new_ext(source, options) {
        renderer.event(event);
    }
    renderer.finish()
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

struct Renderer {
    out: String,
    styled: bool,
    attrs: Vec<Attr>,
    /// One entry per open list: `Some(next number)` for ordered lists.
    lists: Vec<Option<u64>>,
    /// Destinations of open links that need their URL appended.
    links: Vec<Option<String>>,
    quote_depth: usize,
    in_code_block: bool,
    at_line_start: bool,
    blank_pending: bool,
    /// Byte offset where the current heading's text begins, for underlining.
    heading_start: usize,
}

impl Renderer {
    fn new(styled: bool) -> Self {
        Self {
            out: String::new(),
            styled,
            attrs: Vec::new(),
            lists: Vec::new(),
            links: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            at_line_start: true,
            blank_pending: false,
            heading_start: 0,
        }
    }

    fn current_attr(&self) -> Attr {
        self.attrs.iter().fold(Attr::empty(), |acc, a| acc | *a)
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.attrs.push(Attr::INVERSE);
                self.text(&code);
                self.attrs.pop();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.newline(),
            Event::Rule => {
                self.begin_block();
                self.text(&"─".repeat(RULE_WIDTH));
                self.end_block();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.begin_block(),
            Tag::Heading { level, .. } => {
                self.begin_block();
                self.start_line();
                self.heading_start = self.out.len();
                let attr = if level == HeadingLevel::H1 {
                    Attr::BOLD | Attr::UNDERLINE
                } else {
                    Attr::BOLD
                };
                self.attrs.push(attr);
            }
            Tag::BlockQuote(_) => {
                self.begin_block();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(_) => {
                self.begin_block();
                self.in_code_block = true;
                self.attrs.push(Attr::DIM);
            }
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.begin_block();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                self.ensure_line_start();
                self.blank_pending = false;
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.text(&format!("{}{marker}", "  ".repeat(depth)));
            }
            Tag::Emphasis => self.attrs.push(Attr::ITALIC),
            Tag::Strong => self.attrs.push(Attr::BOLD),
            Tag::Strikethrough => self.attrs.push(Attr::STRIKETHROUGH),
            Tag::Link {
                link_type,
                dest_url,
                ..
            } => {
                let suffix = match link_type {
                    LinkType::Autolink | LinkType::Email => None,
                    _ => Some(dest_url.into_string()),
                };
                self.links.push(suffix);
                self.attrs.push(Attr::UNDERLINE);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.end_block(),
            TagEnd::Heading(level) => {
                self.attrs.pop();
                if !self.styled {
                    self.underline_heading(level);
                }
                self.end_block();
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.end_block();
            }
            TagEnd::CodeBlock => {
                self.attrs.pop();
                self.in_code_block = false;
                self.end_block();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.end_block();
                }
            }
            TagEnd::Item => self.ensure_line_start(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.attrs.pop();
            }
            TagEnd::Link => {
                self.attrs.pop();
                if let Some(Some(url)) = self.links.pop() {
                    self.text(&format!(" <{url}>"));
                }
            }
            _ => {}
        }
    }

    // -- Layout -------------------------------------------------------------

    fn begin_block(&mut self) {
        if self.blank_pending && !self.out.is_empty() {
            self.ensure_line_start();
            self.newline();
        }
        self.blank_pending = false;
    }

    fn end_block(&mut self) {
        self.ensure_line_start();
        self.blank_pending = true;
    }

    fn ensure_line_start(&mut self) {
        if !self.at_line_start {
            self.newline();
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    /// Write the line prefix if nothing is on the current line yet.
    fn start_line(&mut self) {
        if self.at_line_start {
            self.line_prefix();
            self.at_line_start = false;
        }
    }

    fn line_prefix(&mut self) {
        for _ in 0..self.quote_depth {
            self.out.push_str("│ ");
        }
        if self.in_code_block {
            self.out.push_str("    ");
        }
    }

    /// Write `text`, splitting on newlines so each line gets its prefix.
    fn text(&mut self, text: &str) {
        let attr = self.current_attr();
        let mut lines = text.split('\n').peekable();
        while let Some(line) = lines.next() {
            let last = lines.peek().is_none();
            // A code block's final newline ends the block, not a line.
            if last && line.is_empty() {
                break;
            }
            self.start_line();
            if self.styled && !attr.is_empty() {
                write_sgr(&mut self.out, attr);
                self.out.push_str(line);
                self.out.push_str(RESET);
            } else {
                self.out.push_str(line);
            }
            if !last {
                self.newline();
            }
        }
    }

    fn underline_heading(&mut self, level: HeadingLevel) {
        let ch = match level {
            HeadingLevel::H1 => '=',
            HeadingLevel::H2 => '-',
            _ => return,
        };
        let width = self.out[self.heading_start..].width();
        self.newline();
        self.start_line();
        let _ = write!(self.out, "{}", ch.to_string().repeat(width));
    }

    fn finish(mut self) -> String {
        let trimmed = self.out.trim_end_matches('\n').len();
        self.out.truncate(trimmed);
        self.out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
