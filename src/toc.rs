//! Per-document table of contents: the current outline plus the tracker state
//! that follows the reader through it.

use crate::config::Config;
use crate::extract::{extract_with, SlugOptions};
use crate::track::{PositionSource, TrackerState};
use crate::types::{HeadingRecord, Outline};

/// Moves the viewport. Implemented by whatever renders the document.
pub trait Scroller {
    /// Bring the anchor for `id` to the top of the viewport.
    fn scroll_to(&mut self, id: &str);

    fn scroll_to_top(&mut self);
}

/// Owns one document's outline and active heading.
///
/// The outline is rebuilt only by [`TableOfContents::set_content`]; the active
/// heading only by the scroll/resize/refresh handlers.
#[derive(Debug, Clone)]
pub struct TableOfContents {
    content: Option<String>,
    outline: Outline,
    state: TrackerState,
    slug: SlugOptions,
}

impl Default for TableOfContents {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl TableOfContents {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            content: None,
            outline: Vec::new(),
            state: TrackerState::new(config.trigger_offset, config.no_candidate),
            slug: config.slug.clone(),
        }
    }

    /// Replace the document. Re-extracts and resets the active heading only if
    /// the content differs from what is loaded. Returns whether it did.
    ///
    /// Positions must be re-sampled before the next [`Self::refresh`].
    pub fn set_content(&mut self, content: &str) -> bool {
        if self.content.as_deref() == Some(content) {
            return false;
        }
        self.outline = extract_with(content, &self.slug);
        self.content = Some(content.to_string());
        self.state.reset();
        log::debug!("outline replaced: {} headings", self.outline.len());
        true
    }

    pub fn outline(&self) -> &[HeadingRecord] {
        &self.outline
    }

    /// Nothing to render.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.state.active_id()
    }

    /// The outline entry currently active, if any.
    pub fn active(&self) -> Option<&HeadingRecord> {
        let id = self.state.active_id()?;
        self.outline.iter().find(|h| h.id == id)
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Mutable access for callers that evaluate asynchronously and commit
    /// with [`TrackerState::begin`] / [`TrackerState::commit`].
    pub fn state_mut(&mut self) -> &mut TrackerState {
        &mut self.state
    }

    /// Re-evaluate against fresh positions. Call once after the outline
    /// changes and the new anchors are laid out.
    pub fn refresh<P: PositionSource + ?Sized>(&mut self, positions: &P) -> Option<&str> {
        self.state.update(&self.outline, positions)
    }

    pub fn on_scroll<P: PositionSource + ?Sized>(&mut self, positions: &P) -> Option<&str> {
        self.refresh(positions)
    }

    pub fn on_resize<P: PositionSource + ?Sized>(&mut self, positions: &P) -> Option<&str> {
        self.refresh(positions)
    }

    /// Ask `scroller` to jump to the heading `id`. Ids not in the outline are
    /// ignored and `false` is returned.
    pub fn navigate(&self, id: &str, scroller: &mut impl Scroller) -> bool {
        if !self.outline.iter().any(|h| h.id == id) {
            log::debug!("navigate: unknown heading id {id:?}");
            return false;
        }
        scroller.scroll_to(id);
        true
    }

    pub fn scroll_to_top(&self, scroller: &mut impl Scroller) {
        scroller.scroll_to_top();
    }
}

/// Left padding of an outline entry in the expanded list, in layout units.
pub fn indent_for(level: u8) -> u32 {
    u32::from(level.saturating_sub(1)) * 12 + 8
}
