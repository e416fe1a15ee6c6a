//! Segment progress → position.
//!
//! # Path interpolation
//!
//! A path of `n + 1` points has `n` edges, each taking an equal share of the
//! segment:
//!
//! ```text
//! edge_progress = progress * n
//! edge_index    = clamp(floor(edge_progress), 0, n - 1)
//! local_t       = edge_progress - edge_index
//! position      = lerp(path[edge_index], path[edge_index + 1], local_t)
//! ```
//!
//! Clamping the index means `progress = 1.0` lands exactly on the last point.
//! Facing comes from the current edge; a zero-length edge keeps the previous
//! facing.

use village_core::{Direction, TilePos};
use village_schedule::{MovementSegment, ScheduleSegment};

/// Position and facing along a movement path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interpolated {
    pub position:  TilePos,
    /// `None` when the current edge has zero length.
    pub direction: Option<Direction>,
}

/// Interpolate along `segment.path` at `progress`.
///
/// `progress` is clamped to `[0, 1]`.  Returns `None` only for an empty path;
/// a single-point path yields that point.
pub fn interpolate(segment: &MovementSegment, progress: f64) -> Option<Interpolated> {
    let path = &segment.path;
    let first = *path.first()?;
    if path.len() == 1 {
        return Some(Interpolated { position: first.into(), direction: None });
    }

    let edges = path.len() - 1;
    let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
    let edge_progress = progress * edges as f64;
    let edge_index = (edge_progress.floor() as usize).min(edges - 1);
    let local_t = edge_progress - edge_index as f64;

    let from = path[edge_index];
    let to = path[edge_index + 1];
    Some(Interpolated {
        position:  TilePos::from(from).lerp(to.into(), local_t),
        direction: Direction::from_delta(f64::from(to.x) - f64::from(from.x), f64::from(to.y) - f64::from(from.y)),
    })
}

/// Where a segment puts the agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    pub position:  TilePos,
    /// `None` keeps the previous facing.
    pub direction: Option<Direction>,
    pub is_moving: bool,
}

/// Placement for any segment kind at `progress`.
///
/// Activities pin the agent to their location.  `Hold` segments, and a
/// degenerate movement with no path, leave the agent at `last`.
pub fn place(segment: &ScheduleSegment, progress: f64, last: TilePos) -> Placement {
    match segment {
        ScheduleSegment::Activity(a) => Placement {
            position:  a.location.into(),
            direction: None,
            is_moving: false,
        },
        ScheduleSegment::Movement(m) => match interpolate(m, progress) {
            Some(i) => Placement { position: i.position, direction: i.direction, is_moving: true },
            None => Placement { position: last, direction: None, is_moving: false },
        },
        ScheduleSegment::Hold(_) => Placement { position: last, direction: None, is_moving: false },
    }
}
