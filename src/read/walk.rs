//! Markdown file discovery.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;

use super::is_markdown;
use crate::error::{Result, TocError};

// Directories that are always skipped — build artifacts, dependencies, VCS internals.
pub(crate) const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    "vendor",
    ".next",
    ".nuxt",
    ".cache",
    ".venv",
    ".svelte-kit",
    ".vercel",
    ".netlify",
    ".idea",
];

/// Expand `inputs` into a sorted, de-duplicated list of documents.
///
/// Files are taken as given regardless of extension. Directories are walked
/// for markdown files, honoring `.gitignore` and skipping [`SKIP_DIRS`]. If
/// `pattern` is set, walked files must also match it (relative to the walked
/// directory).
pub fn collect_documents(inputs: &[PathBuf], pattern: Option<&str>) -> Result<Vec<PathBuf>> {
    let matcher = pattern.map(compile_glob).transpose()?;
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            walk_dir(input, matcher.as_ref(), &mut files);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            return Err(TocError::NotFound {
                path: input.clone(),
            });
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| TocError::InvalidGlob {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

fn walk_dir(root: &Path, matcher: Option<&GlobMatcher>, out: &mut Vec<PathBuf>) {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !SKIP_DIRS.contains(&name))
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if !is_markdown(path) {
            continue;
        }
        if let Some(m) = matcher {
            let rel = path.strip_prefix(root).unwrap_or(path);
            if !m.is_match(rel) {
                continue;
            }
        }
        out.push(path.to_path_buf());
    }
}
