//! `village-mobility`: where agents stand and how they got there.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`interpolate`] | `interpolate` (path → position), `place` (any segment)       |
//! | [`state`]       | `AgentState`, `Motion`, `AgentClock`                         |
//! | [`store`]       | `AgentStore`: per-agent state and clocks indexed by `AgentId` |
//! | [`plan`]        | `StepPlan`, `plan_step`, `Transition`                        |
//! | [`error`]       | `MobilityError`, `MobilityResult<T>`                         |
//!
//! # Tick model
//!
//! Each tick runs in two passes:
//!
//! 1. **Plan** (read-only): for every free agent, project its schedule at
//!    its *local* time and compute the new placement.  `plan_step` only reads
//!    the schedule and the previous state, so this pass can run in parallel.
//! 2. **Apply**: `AgentStore::apply` writes the placement back and reports
//!    a `Transition` whenever the agent entered a new segment.
//!
//! # Frozen clocks
//!
//! An interacting agent's schedule clock stops.  Its local time is
//!
//! ```text
//! local = now - paused_secs          (free)
//! local = frozen_since - paused_secs (interacting)
//! ```
//!
//! and on release the frozen span is added to `paused_secs`, so the agent
//! resumes exactly where it stopped instead of jumping ahead.

pub mod error;
pub mod interpolate;
pub mod plan;
pub mod state;
pub mod store;


pub use error::{MobilityError, MobilityResult};
pub use interpolate::{interpolate, place, Interpolated, Placement};
pub use plan::{plan_step, StepPlan, Transition};
pub use state::{AgentClock, AgentState, Motion};
pub use store::AgentStore;
