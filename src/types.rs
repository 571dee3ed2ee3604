use std::fmt;

use serde::{Deserialize, Serialize};

/// One heading found in a markdown document.
///
/// `id` is the anchor slug, `text` the trimmed display text and `level` the
/// number of leading `#` characters (1..=6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub id: String,
    pub text: String,
    pub level: u8,
}

impl HeadingRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            level,
        }
    }
}

impl fmt::Display for HeadingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (#{})", "#".repeat(self.level as usize), self.text, self.id)
    }
}

/// Flat, document-ordered list of headings. Not a tree: nesting is implied by
/// `level` only.
pub type Outline = Vec<HeadingRecord>;

/// Truncate a string to at most `max` bytes on a char boundary.
pub fn truncate_str(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_level_and_anchor() {
        let h = HeadingRecord::new("setup", "Setup", 2);
        assert_eq!(h.to_string(), "## Setup (#setup)");
    }

    #[test]
    fn truncate_respects_char_boundary() {
        // "目" is 3 bytes
        assert_eq!(truncate_str("目录", 4), "目");
        assert_eq!(truncate_str("abc", 10), "abc");
    }
}
