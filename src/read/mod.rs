pub mod walk;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use memmap2::Mmap;

use crate::cache::OutlineCache;
use crate::error::{Result, TocError};
use crate::extract::{extract_with, SlugOptions};
use crate::types::Outline;

/// Read a document as text. Invalid UTF-8 is replaced rather than rejected,
/// since a lossy heading is better than no outline.
pub fn read_document(path: &Path) -> Result<String> {
    let meta = fs::metadata(path).map_err(|e| TocError::from_io(path, e))?;

    if meta.is_dir() {
        return Err(TocError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "is a directory"),
        });
    }

    // Empty check before mmap — mmap on 0-byte file may fail on some platforms
    if meta.len() == 0 {
        return Ok(String::new());
    }

    let file = fs::File::open(path).map_err(|e| TocError::from_io(path, e))?;
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| TocError::from_io(path, e))?;
    Ok(String::from_utf8_lossy(&mmap[..]).into_owned())
}

/// Outline of the file at `path`, served from `cache` while its mtime is
/// unchanged.
pub fn outline_file(path: &Path, opts: &SlugOptions, cache: &OutlineCache) -> Result<Arc<Outline>> {
    let meta = fs::metadata(path).map_err(|e| TocError::from_io(path, e))?;
    let mtime = meta.modified().unwrap_or(std::time::SystemTime::UNIX_EPOCH);

    cache.get_or_compute(path, mtime, || {
        let content = read_document(path)?;
        Ok(extract_with(&content, opts))
    })
}

/// Whether `path` looks like a markdown document.
pub fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown" | "mdx" | "mdown" | "mkd")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_and_outlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "# Title\n\n## Part\n").unwrap();

        let cache = OutlineCache::new();
        let outline = outline_file(&path, &SlugOptions::default(), &cache).unwrap();
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[1].id, "part");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn empty_file_has_empty_outline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.md");
        fs::write(&path, "").unwrap();
        assert_eq!(read_document(&path).unwrap(), "");
        let outline = outline_file(&path, &SlugOptions::default(), &OutlineCache::new()).unwrap();
        assert!(outline.is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("gone.md")).unwrap_err();
        assert!(matches!(err, TocError::NotFound { .. }));
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, b"# Ok\xff\n").unwrap();
        let text = read_document(&path).unwrap();
        assert!(text.starts_with("# Ok"));
    }

    #[test]
    fn markdown_extensions() {
        assert!(is_markdown(Path::new("README.md")));
        assert!(is_markdown(Path::new("a/b.markdown")));
        assert!(!is_markdown(Path::new("main.rs")));
        assert!(!is_markdown(Path::new("Makefile")));
    }
}
