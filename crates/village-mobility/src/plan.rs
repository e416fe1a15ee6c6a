//! Read-only step planning.

use village_core::AgentId;
use village_schedule::{Projection, Schedule};

use crate::{place, AgentState, Placement};

/// What one agent should look like after this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepPlan {
    pub agent:      AgentId,
    pub projection: Projection,
    pub placement:  Placement,
}

/// A segment boundary crossed during a tick.
///
/// Only the segment left and the segment entered are reported, even if a
/// long step skipped over others.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub agent:     AgentId,
    pub completed: usize,
    pub started:   usize,
    /// Cycle of the `started` segment.
    pub cycle:     u64,
}

/// Project `schedule` at `local_secs` and place the agent accordingly.
///
/// Pure: reads `state` only for the fallback position used by `Hold`.
pub fn plan_step(schedule: &Schedule, state: &AgentState, local_secs: f64) -> StepPlan {
    let projection = schedule.project(local_secs);
    let placement = match schedule.segment(projection.segment_index) {
        Some(segment) => place(segment, projection.progress, state.position),
        None => Placement { position: state.position, direction: None, is_moving: false },
    };
    StepPlan { agent: state.id, projection, placement }
}
