//! Anchor slugs for heading text.

use serde::{Deserialize, Serialize};

/// Inclusive range of code points kept verbatim in slugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRange {
    pub start: char,
    pub end: char,
}

impl CharRange {
    pub const fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    fn contains(self, c: char) -> bool {
        self.start <= c && c <= self.end
    }
}

/// CJK Unified Ideographs, U+4E00..=U+9FA5.
pub const CJK_IDEOGRAPHS: CharRange = CharRange::new('\u{4e00}', '\u{9fa5}');

/// Which non-ASCII characters survive slugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugOptions {
    pub preserve: Vec<CharRange>,
}

impl Default for SlugOptions {
    fn default() -> Self {
        Self {
            preserve: vec![CJK_IDEOGRAPHS],
        }
    }
}

impl SlugOptions {
    fn is_word_char(&self, c: char) -> bool {
        c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || self.preserve.iter().any(|r| r.contains(c))
    }
}

/// Lower-case `text`, collapse every run of non-word characters into a single
/// `-`, and drop a leading or trailing `-`. May return an empty string.
///
/// ```
/// use tocsync::extract::slug::{slugify, SlugOptions};
///
/// let opts = SlugOptions::default();
/// assert_eq!(slugify("Hello, World!", &opts), "hello-world");
/// assert_eq!(slugify("安裝 Guide", &opts), "安裝-guide");
/// ```
pub fn slugify(text: &str, opts: &SlugOptions) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut in_gap = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if opts.is_word_char(c) {
            slug.push(c);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }

    let slug = slug.strip_prefix('-').unwrap_or(&slug);
    let slug = slug.strip_suffix('-').unwrap_or(slug);
    slug.to_string()
}
