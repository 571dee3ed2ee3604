use std::fmt::Write;
use std::path::Path;

use serde::Serialize;

use crate::types::{truncate_str, HeadingRecord};

const MAX_TEXT: usize = 80;

/// Build the standard header line:
/// `# path/to/doc.md (N headings)`
pub fn outline_header(path: &Path, count: usize) -> String {
    let noun = if count == 1 { "heading" } else { "headings" };
    format!("# {} ({count} {noun})", path.display())
}

/// One line per heading, indented two spaces per level below 1, with the
/// anchor id after the text. The active heading is marked with `>`.
///
/// ```text
///   Intro  #intro
/// >   Setup  #setup
/// ```
pub fn render_text(outline: &[HeadingRecord], active: Option<&str>) -> String {
    let mut out = String::new();
    let mut marked = false;

    for h in outline {
        // duplicate ids: only the first match is marked
        let is_active = !marked && active == Some(h.id.as_str());
        marked |= is_active;

        let marker = if is_active { '>' } else { ' ' };
        let indent = "  ".repeat(usize::from(h.level.saturating_sub(1)));
        let text = if h.text.len() > MAX_TEXT {
            format!("{}...", truncate_str(&h.text, MAX_TEXT - 3))
        } else {
            h.text.clone()
        };
        let _ = writeln!(out, "{marker} {indent}{text}  #{}", h.id);
    }

    out
}

#[derive(Serialize)]
struct OutlineJson<'a> {
    headings: &'a [HeadingRecord],
    active: Option<&'a str>,
}

/// `{"headings": [{"id", "text", "level"}, ...], "active": id | null}`
pub fn render_json(outline: &[HeadingRecord], active: Option<&str>) -> serde_json::Value {
    serde_json::json!(OutlineJson {
        headings: outline,
        active,
    })
}
