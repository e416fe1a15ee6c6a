//! Per-agent runtime state.

use serde::Serialize;

use village_core::{AgentId, Direction, TileCoord, TilePos};

/// Whether an agent is walking or standing, as reported to collaborators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Motion {
    Moving,
    Idle,
}

/// The mutable state of one character.
///
/// Owned by the simulation and written once per tick.  Observers receive
/// read-only snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentState {
    pub id:   AgentId,
    pub name: String,

    /// Continuous tile-space position.
    pub position:  TilePos,
    pub direction: Direction,
    pub is_moving: bool,

    /// Index of the active schedule segment.
    pub current_segment_index: usize,
    /// Schedule cycle the active segment belongs to.
    pub cycle: u64,

    pub is_interacting:   bool,
    pub interacting_with: Option<AgentId>,
}

impl AgentState {
    /// A free, idle agent facing down at `tile`.
    pub fn spawned(id: AgentId, name: impl Into<String>, tile: TileCoord, segment_index: usize) -> Self {
        Self {
            id,
            name: name.into(),
            position: tile.into(),
            direction: Direction::default(),
            is_moving: false,
            current_segment_index: segment_index,
            cycle: 0,
            is_interacting: false,
            interacting_with: None,
        }
    }

    /// The tile used for adjacency tests.
    #[inline]
    pub fn tile(&self) -> TileCoord {
        self.position.rounded()
    }

    #[inline]
    pub fn motion(&self) -> Motion {
        if self.is_moving { Motion::Moving } else { Motion::Idle }
    }
}

/// Per-agent schedule clock with pause support.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AgentClock {
    /// Total simulated seconds spent frozen in completed interactions.
    pub paused_secs: f64,
    /// Global time at which the current freeze began.
    pub frozen_since: Option<f64>,
}

impl AgentClock {
    /// Schedule-local time corresponding to global time `now`.
    #[inline]
    pub fn local_secs(&self, now: f64) -> f64 {
        self.frozen_since.unwrap_or(now) - self.paused_secs
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen_since.is_some()
    }

    /// Stop the clock at `now`.  No-op if already frozen.
    pub fn freeze(&mut self, now: f64) {
        if self.frozen_since.is_none() {
            self.frozen_since = Some(now);
        }
    }

    /// Restart the clock at `now`, banking the frozen span.
    pub fn thaw(&mut self, now: f64) {
        if let Some(since) = self.frozen_since.take() {
            self.paused_secs += (now - since).max(0.0);
        }
    }
}
