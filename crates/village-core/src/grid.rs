//! Tile-space geometry.
//!
//! Positions live in tile space: `x` is the column, `y` the row, and `y`
//! grows downward (row 0 is the top edge of the map).  Agents move through
//! continuous `TilePos` values; adjacency and tile lookups use the rounded
//! integer `TileCoord`.

use serde::{Deserialize, Serialize};

// ── TileCoord ─────────────────────────────────────────────────────────────────

/// An integer tile coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|`.  Widened to `u64` so any two `i32`
    /// tiles have a distance.
    #[inline]
    pub fn manhattan(self, other: TileCoord) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }
}

impl From<[i32; 2]> for TileCoord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<TileCoord> for TilePos {
    fn from(c: TileCoord) -> Self {
        TilePos { x: c.x as f64, y: c.y as f64 }
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ── TilePos ───────────────────────────────────────────────────────────────────

/// A continuous position in tile space.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct TilePos {
    pub x: f64,
    pub y: f64,
}

impl TilePos {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest tile, rounding halves away from zero.
    #[inline]
    pub fn rounded(self) -> TileCoord {
        TileCoord::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Linear interpolation from `self` to `to` by `t ∈ [0, 1]`.
    #[inline]
    pub fn lerp(self, to: TilePos, t: f64) -> TilePos {
        TilePos {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }
}

impl std::fmt::Display for TilePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// Facing of an agent sprite.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Facing for a step of `(dx, dy)`.
    ///
    /// Horizontal wins when `|dx| >= |dy|`.  Returns `None` for a zero step so
    /// callers keep the previous facing.
    pub fn from_delta(dx: f64, dy: f64) -> Option<Direction> {
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        if dx.abs() >= dy.abs() {
            Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
        } else {
            Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
        }
    }
}
