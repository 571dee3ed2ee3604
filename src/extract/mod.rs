//! Heading extraction via memchr line scan, no markdown parser needed.
//!
//! Code is suppressed first (see `strip`), then every line starting with
//! one to six `#` followed by whitespace becomes a candidate heading. Each
//! candidate gets a slug id; candidates with empty text or an empty slug are
//! dropped.

pub mod slug;
pub(crate) mod strip;

use std::collections::HashMap;

use crate::types::{HeadingRecord, Outline};

pub use slug::{slugify, CharRange, SlugOptions};

/// Deepest markdown heading level.
pub const MAX_LEVEL: usize = 6;

/// Extract the outline of `content` with default slug options.
///
/// ```
/// let outline = tocsync::extract("```\n# not a heading\n```\n# Real\n");
/// assert_eq!(outline.len(), 1);
/// assert_eq!(outline[0].id, "real");
/// ```
pub fn extract(content: &str) -> Outline {
    extract_with(content, &SlugOptions::default())
}

/// Extract the outline of `content`. Never fails; malformed input yields
/// fewer headings. Duplicate ids are emitted as they are.
pub fn extract_with(content: &str, opts: &SlugOptions) -> Outline {
    let clean = strip::strip_code(content);
    let buf = clean.as_bytes();
    let mut outline = Vec::new();
    let mut pos = 0;

    while pos < buf.len() {
        let line_end = memchr::memchr(b'\n', &buf[pos..]).map_or(buf.len(), |i| pos + i);
        let line = &clean[pos..line_end];

        if let Some((level, text)) = parse_heading(line) {
            let id = slugify(text, opts);
            if !id.is_empty() {
                outline.push(HeadingRecord::new(id, text, level));
            }
        }

        pos = line_end + 1;
    }

    log::trace!(
        "extracted {} headings from {} bytes",
        outline.len(),
        content.len()
    );
    outline
}

/// Match `^#{1,6}\s+(.+)$` on a single line and return the level and the
/// trimmed text. Seven or more `#` never match.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > MAX_LEVEL {
        return None;
    }

    let rest = &line[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    // level <= 6
    Some((level as u8, text))
}

/// Ids that occur more than once in `outline`, in first-seen order.
///
/// Extraction never renames colliding slugs; this only reports them so a
/// caller can decide what to do.
pub fn duplicate_ids(outline: &[HeadingRecord]) -> Vec<&str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for h in outline {
        *counts.entry(h.id.as_str()).or_default() += 1;
    }

    let mut dups = Vec::new();
    for h in outline {
        if counts.get(h.id.as_str()).copied().unwrap_or(0) > 1 && !dups.contains(&h.id.as_str()) {
            dups.push(h.id.as_str());
        }
    }
    dups
}
