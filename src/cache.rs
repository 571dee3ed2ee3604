//! Outline cache for file inputs, keyed by path and modification time.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;

use crate::types::Outline;

/// Concurrent cache so repeated reads of an unchanged file (MCP sessions,
/// overlapping CLI paths) skip extraction. Entries whose mtime no longer
/// matches are recomputed.
pub struct OutlineCache {
    entries: DashMap<PathBuf, (SystemTime, Arc<Outline>)>,
}

impl Default for OutlineCache {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Cached outline for `path` at `mtime`, or the result of `compute`. A
    /// failed compute leaves the cache untouched.
    pub fn get_or_compute<E>(
        &self,
        path: &Path,
        mtime: SystemTime,
        compute: impl FnOnce() -> Result<Outline, E>,
    ) -> Result<Arc<Outline>, E> {
        if let Some(entry) = self.entries.get(path) {
            if entry.0 == mtime {
                return Ok(Arc::clone(&entry.1));
            }
        }

        let outline = Arc::new(compute()?);
        self.entries
            .insert(path.to_path_buf(), (mtime, Arc::clone(&outline)));
        Ok(outline)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
