//! Table of contents for long markdown documents, kept in step with the
//! reader's scroll position.
//!
//! Two independent pieces:
//!
//! - [`extract`] turns markdown into a flat, ordered [`Outline`] of
//!   [`HeadingRecord`]s, ignoring `#` lines inside code.
//! - [`evaluate`] / [`TrackerState`] pick the active heading from the screen
//!   offsets of the heading anchors.
//!
//! [`TableOfContents`] ties both to one document for event-driven callers.
//!
//! ```
//! use std::collections::HashMap;
//! use tocsync::TableOfContents;
//!
//! let mut toc = TableOfContents::default();
//! toc.set_content("# Intro\n\n## Install\n\n## Usage\n");
//!
//! let positions: HashMap<String, f64> = [
//!     ("intro".to_string(), -400.0),
//!     ("install".to_string(), 40.0),
//!     ("usage".to_string(), 900.0),
//! ]
//! .into_iter()
//! .collect();
//! assert_eq!(toc.on_scroll(&positions), Some("install"));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod mcp;
pub mod read;
pub mod toc;
pub mod track;
pub mod types;

pub use config::Config;
pub use error::{Result, TocError};
pub use extract::{duplicate_ids, extract, extract_with, slugify, SlugOptions};
pub use toc::{Scroller, TableOfContents};
pub use track::{evaluate, FnPositions, Generation, NoCandidate, PositionSource, TrackerState, TRIGGER_OFFSET};
pub use types::{HeadingRecord, Outline};
