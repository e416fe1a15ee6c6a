//! Schedule segments.
//!
//! # Kinds
//!
//! | Kind       | Position during the segment        | Logged |
//! |------------|------------------------------------|--------|
//! | `Activity` | fixed `location`                   | yes    |
//! | `Movement` | interpolated along `path`          | yes    |
//! | `Hold`     | whatever the agent last occupied   | no     |
//!
//! `Hold` is what the loader substitutes for a segment whose timing is sound
//! but whose spatial data is not (missing `location`, short `path`, unknown
//! `type`).  It keeps the time slot so the rest of the day stays aligned.

use std::borrow::Cow;

use village_core::TileCoord;

use crate::{ScheduleError, ScheduleResult};

// ── Payloads ──────────────────────────────────────────────────────────────────

/// Stay on one tile for `duration_secs`.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivitySegment {
    pub location:      TileCoord,
    pub zone:          String,
    pub duration_secs: u32,
    pub label:         String,
}

/// Walk a precomputed path for `duration_secs`.
///
/// The path is traversed at constant speed per sub-edge: each of the
/// `path.len() - 1` edges takes the same share of the duration.
#[derive(Clone, Debug, PartialEq)]
pub struct MovementSegment {
    /// At least two points.
    pub path:          Vec<TileCoord>,
    pub start_zone:    String,
    pub end_zone:      String,
    pub duration_secs: u32,
}

/// Placeholder that occupies a time slot without moving the agent.
#[derive(Clone, Debug, PartialEq)]
pub struct HeldSegment {
    pub duration_secs: u32,
    pub label:         String,
    pub zone:          String,
    /// Why the input segment could not be used.
    pub reason:        String,
}

impl MovementSegment {
    /// Label used in log entries: `"<start_zone> -> <end_zone>"`.
    pub fn label(&self) -> String {
        format!("{} -> {}", self.start_zone, self.end_zone)
    }
}

// ── ScheduleSegment ───────────────────────────────────────────────────────────

/// One timed entry in a persona's schedule.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduleSegment {
    Activity(ActivitySegment),
    Movement(MovementSegment),
    Hold(HeldSegment),
}

impl ScheduleSegment {
    #[inline]
    pub fn duration_secs(&self) -> u32 {
        match self {
            ScheduleSegment::Activity(a) => a.duration_secs,
            ScheduleSegment::Movement(m) => m.duration_secs,
            ScheduleSegment::Hold(h) => h.duration_secs,
        }
    }

    #[inline]
    pub fn is_movement(&self) -> bool {
        matches!(self, ScheduleSegment::Movement(_))
    }

    #[inline]
    pub fn is_hold(&self) -> bool {
        matches!(self, ScheduleSegment::Hold(_))
    }

    /// Human-readable description used as the `activity` field of log entries.
    pub fn label(&self) -> Cow<'_, str> {
        match self {
            ScheduleSegment::Activity(a) => Cow::Borrowed(&a.label),
            ScheduleSegment::Movement(m) => Cow::Owned(m.label()),
            ScheduleSegment::Hold(h) => Cow::Borrowed(&h.label),
        }
    }

    /// Zone the agent is in when the segment begins.
    pub fn start_zone(&self) -> &str {
        match self {
            ScheduleSegment::Activity(a) => &a.zone,
            ScheduleSegment::Movement(m) => &m.start_zone,
            ScheduleSegment::Hold(h) => &h.zone,
        }
    }

    /// Zone the agent is in when the segment ends.
    pub fn end_zone(&self) -> &str {
        match self {
            ScheduleSegment::Activity(a) => &a.zone,
            ScheduleSegment::Movement(m) => &m.end_zone,
            ScheduleSegment::Hold(h) => &h.zone,
        }
    }

    /// Tile the segment starts on.  `None` for `Hold`.
    pub fn start_tile(&self) -> Option<TileCoord> {
        match self {
            ScheduleSegment::Activity(a) => Some(a.location),
            ScheduleSegment::Movement(m) => m.path.first().copied(),
            ScheduleSegment::Hold(_) => None,
        }
    }

    /// Tile the segment ends on.  `None` for `Hold`.
    pub fn end_tile(&self) -> Option<TileCoord> {
        match self {
            ScheduleSegment::Activity(a) => Some(a.location),
            ScheduleSegment::Movement(m) => m.path.last().copied(),
            ScheduleSegment::Hold(_) => None,
        }
    }

    /// Every tile the segment references, for map sanity checks.
    pub fn tiles(&self) -> &[TileCoord] {
        match self {
            ScheduleSegment::Activity(a) => std::slice::from_ref(&a.location),
            ScheduleSegment::Movement(m) => &m.path,
            ScheduleSegment::Hold(_) => &[],
        }
    }

    /// Check the structural invariants: positive duration, and at least two
    /// path points for a movement.  `index` is only used in the error.
    pub fn validate(&self, index: usize) -> ScheduleResult<()> {
        if self.duration_secs() == 0 {
            return Err(ScheduleError::MalformedSegment {
                index,
                reason: "duration must be positive".into(),
            });
        }
        if let ScheduleSegment::Movement(m) = self {
            if m.path.len() < 2 {
                return Err(ScheduleError::MalformedSegment {
                    index,
                    reason: format!("movement path has {} point(s), need at least 2", m.path.len()),
                });
            }
        }
        Ok(())
    }
}
