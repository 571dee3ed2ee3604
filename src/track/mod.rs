//! Active section tracking.
//!
//! Given an outline and the current screen offset of each heading's anchor,
//! the active heading is the last one (in document order) whose offset is at
//! or above the trigger line. The walk stops at the first measured heading
//! below the line, since offsets grow down the document.

mod sample;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::HeadingRecord;

pub use sample::{positions_from_json, positions_from_str};

/// Distance from the top of the viewport within which a heading counts as
/// reached.
pub const TRIGGER_OFFSET: f64 = 120.0;

/// Where heading anchors currently are, relative to the viewport top.
///
/// `None` means the anchor is not mounted or not measurable; the tracker skips
/// such headings without ending the walk.
pub trait PositionSource {
    fn position(&self, id: &str) -> Option<f64>;
}

impl PositionSource for HashMap<String, f64> {
    fn position(&self, id: &str) -> Option<f64> {
        self.get(id).copied()
    }
}

impl PositionSource for BTreeMap<String, f64> {
    fn position(&self, id: &str) -> Option<f64> {
        self.get(id).copied()
    }
}

impl<P: PositionSource + ?Sized> PositionSource for &P {
    fn position(&self, id: &str) -> Option<f64> {
        (**self).position(id)
    }
}

/// Adapts a closure (e.g. a layout query) into a [`PositionSource`].
pub struct FnPositions<F>(pub F);

impl<F> PositionSource for FnPositions<F>
where
    F: Fn(&str) -> Option<f64>,
{
    fn position(&self, id: &str) -> Option<f64> {
        (self.0)(id)
    }
}

/// Find the active heading id.
///
/// ```
/// use std::collections::HashMap;
/// use tocsync::{evaluate, HeadingRecord, TRIGGER_OFFSET};
///
/// let outline = vec![
///     HeadingRecord::new("a", "A", 1),
///     HeadingRecord::new("b", "B", 2),
/// ];
/// let positions: HashMap<String, f64> =
///     [("a".to_string(), -30.0), ("b".to_string(), 90.0)].into_iter().collect();
/// assert_eq!(evaluate(&outline, &positions, TRIGGER_OFFSET), Some("b"));
/// ```
pub fn evaluate<'a, P>(outline: &'a [HeadingRecord], positions: &P, trigger_offset: f64) -> Option<&'a str>
where
    P: PositionSource + ?Sized,
{
    let mut candidate = None;

    for heading in outline {
        // NaN compares false against everything; treat it as unmeasured
        let Some(top) = positions.position(&heading.id).filter(|p| !p.is_nan()) else {
            continue;
        };
        if top <= trigger_offset {
            candidate = Some(heading.id.as_str());
        } else {
            break;
        }
    }

    candidate
}

/// What [`TrackerState`] does when no heading has reached the trigger line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoCandidate {
    /// Keep the previously active id.
    #[default]
    Retain,
    /// Report no active heading.
    Clear,
}

/// Ticket for one evaluation. Only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// The active heading carried between scroll events.
///
/// Single writer: only [`TrackerState::commit`] (and the helpers built on it)
/// change `active_id`.
#[derive(Debug, Clone)]
pub struct TrackerState {
    active_id: Option<String>,
    generation: u64,
    trigger_offset: f64,
    no_candidate: NoCandidate,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::new(TRIGGER_OFFSET, NoCandidate::default())
    }
}

impl TrackerState {
    #[must_use]
    pub fn new(trigger_offset: f64, no_candidate: NoCandidate) -> Self {
        Self {
            active_id: None,
            generation: 0,
            trigger_offset,
            no_candidate,
        }
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn trigger_offset(&self) -> f64 {
        self.trigger_offset
    }

    /// Start an evaluation. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> Generation {
        self.generation += 1;
        Generation(self.generation)
    }

    /// Apply the result of the evaluation started with `ticket`.
    ///
    /// Returns `false` and changes nothing if a newer evaluation has begun
    /// since.
    pub fn commit(&mut self, ticket: Generation, result: Option<&str>) -> bool {
        if ticket.0 != self.generation {
            log::trace!("dropping stale evaluation {} (current {})", ticket.0, self.generation);
            return false;
        }

        let next = match (result, self.no_candidate) {
            (Some(id), _) => Some(id),
            (None, NoCandidate::Retain) => return true,
            (None, NoCandidate::Clear) => None,
        };

        if self.active_id.as_deref() != next {
            log::debug!("active heading: {:?} -> {:?}", self.active_id, next);
            self.active_id = next.map(str::to_string);
        }
        true
    }

    /// Evaluate and commit in one step.
    pub fn update<P>(&mut self, outline: &[HeadingRecord], positions: &P) -> Option<&str>
    where
        P: PositionSource + ?Sized,
    {
        let ticket = self.begin();
        let result = evaluate(outline, positions, self.trigger_offset);
        self.commit(ticket, result);
        self.active_id()
    }

    /// Forget the active heading and invalidate in-flight evaluations. Call
    /// when the outline is replaced.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.active_id = None;
    }
}
