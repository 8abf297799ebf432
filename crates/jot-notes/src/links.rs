//! Link detection: web URLs and e-mail addresses in note text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// What kind of link a match is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Web,
    Email,
}

/// A link found in text. `range` is in bytes, for slicing the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub kind: LinkKind,
    pub range: Range<usize>,
}

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?P<web>\b(?:https?://|www\.)[^\s<>]*[^\s<>.,;:!?)\]'"])"#,
        r"|(?P<email>\b[\w.+-]+@[\w-]+(?:\.[\w-]+)*\.[A-Za-z]{2,}\b)",
    ))
    .expect("link pattern is valid")
});

/// Find every link in `text`, in order.
#[must_use]
pub fn find_links(text: &str) -> Vec<Link> {
    LINK.captures_iter(text)
        .filter_map(|caps| {
            if let Some(m) = caps.name("web") {
                Some(Link {
                    kind: LinkKind::Web,
                    range: m.range(),
                })
            } else {
                caps.name("email").map(|m| Link {
                    kind: LinkKind::Email,
                    range: m.range(),
                })
            }
        })
        .collect()
}

/// Wrap every link in `text` with `open` and `close` markers.
#[must_use]
pub fn highlight_links(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for link in find_links(text) {
        out.push_str(&text[last..link.range.start]);
        out.push_str(open);
        out.push_str(&text[link.range.clone()]);
        out.push_str(close);
        last = link.range.end;
    }
    out.push_str(&text[last..]);
    out
}
