//! Code suppression: removes fenced blocks, inline spans and indented code
//! lines so that `#` inside code is never read as a heading.
//!
//! Three passes, always in this order. Each pass sees the output of the one
//! before it, so an inline span can never reopen a region a fence already
//! removed.

use memchr::memchr;
use memchr::memmem;

const FENCE: &[u8] = b"```";

/// Run all three suppression passes.
pub(crate) fn strip_code(content: &str) -> String {
    let fenced = strip_fenced(content);
    let inline = strip_inline(&fenced);
    strip_indented(&inline)
}

/// Remove every region from a triple backtick up to and including the next
/// triple backtick. Regions may start mid-line and span lines. An opener with
/// no closer leaves the rest of the text untouched.
pub(crate) fn strip_fenced(content: &str) -> String {
    let buf = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut pos = 0;

    while let Some(open) = memmem::find(&buf[pos..], FENCE).map(|i| pos + i) {
        let body = open + FENCE.len();
        let Some(close) = memmem::find(&buf[body..], FENCE).map(|i| body + i) else {
            break;
        };
        out.push_str(&content[pos..open]);
        pos = close + FENCE.len();
    }

    out.push_str(&content[pos..]);
    out
}

/// Remove backtick pairs and everything between them. Newlines inside the
/// pair are removed too. A trailing unpaired backtick stays.
pub(crate) fn strip_inline(content: &str) -> String {
    let buf = content.as_bytes();
    let mut out = String::with_capacity(content.len());
    let mut pos = 0;

    while let Some(open) = memchr(b'`', &buf[pos..]).map(|i| pos + i) {
        let Some(close) = memchr(b'`', &buf[open + 1..]).map(|i| open + 1 + i) else {
            break;
        };
        out.push_str(&content[pos..open]);
        pos = close + 1;
    }

    out.push_str(&content[pos..]);
    out
}

/// Blank every line that starts with four spaces or a tab. The line break is
/// kept so later line numbering is unaffected.
pub(crate) fn strip_indented(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if is_indented_code(line) {
            if line.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(line);
        }
    }
    out
}

fn is_indented_code(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}
