use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TocError};
use crate::extract::SlugOptions;
use crate::track::{NoCandidate, TRIGGER_OFFSET};

/// File looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE: &str = "tocsync.toml";

/// Settings shared by the CLI, the MCP server and [`crate::TableOfContents`].
///
/// ```toml
/// trigger_offset = 96.0
/// no_candidate = "clear"
///
/// [[slug.preserve]]
/// start = "぀"
/// end = "ヿ"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distance from the viewport top at which a heading becomes active.
    pub trigger_offset: f64,
    pub no_candidate: NoCandidate,
    pub slug: SlugOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger_offset: TRIGGER_OFFSET,
            no_candidate: NoCandidate::default(),
            slug: SlugOptions::default(),
        }
    }
}

impl Config {
    /// Parse and validate TOML text. `path` is only used in error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| TocError::Config {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TocError::from_io(path, e))?;
        Self::from_toml(&text, path)
    }

    /// Explicit path if given, else `tocsync.toml` in `dir` if it exists,
    /// else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate: PathBuf = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            log::debug!("using config {}", candidate.display());
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if !self.trigger_offset.is_finite() || self.trigger_offset < 0.0 {
            return Err(TocError::Config {
                path: path.to_path_buf(),
                reason: format!(
                    "trigger_offset must be a finite non-negative number, got {}",
                    self.trigger_offset
                ),
            });
        }
        if let Some(r) = self.slug.preserve.iter().find(|r| r.start > r.end) {
            return Err(TocError::Config {
                path: path.to_path_buf(),
                reason: format!(
                    "slug.preserve range is reversed: U+{:04X}..U+{:04X}",
                    r.start as u32, r.end as u32
                ),
            });
        }
        Ok(())
    }
}
