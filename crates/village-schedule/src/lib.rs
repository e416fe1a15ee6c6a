//! `village-schedule`: persona schedules, cyclic time projection, loading.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`segment`]   | `ScheduleSegment` and its `Activity` / `Movement` / `Hold` payloads |
//! | [`schedule`]  | `Schedule` (one persona), `ScheduleSet` (the ScheduleStore) |
//! | [`projector`] | `project`, `Projection`: elapsed time → (segment, progress) |
//! | [`loader`]    | `load_schedules_str`, `load_schedules_file`, `LoadReport`  |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                       |
//!
//! # Cycle model (summary)
//!
//! A schedule is a cyclic list of timed segments with total length `T`.  At
//! simulated second `t`:
//!
//! ```text
//! cycle   = floor(t / T)
//! t_norm  = t mod T
//! current = first segment whose cumulative end > t_norm
//! ```
//!
//! Position is therefore a pure function of elapsed time: nothing is
//! accumulated per tick, so a run can be fast-forwarded or replayed.

pub mod error;
pub mod loader;
pub mod projector;
pub mod schedule;
pub mod segment;


pub use error::{ScheduleError, ScheduleResult};
pub use loader::{
    load_schedules_file, load_schedules_reader, load_schedules_str, LoadReport, LoadedSchedules,
    Quarantined, SegmentIssue,
};
pub use projector::{project, Projection};
pub use schedule::{Schedule, ScheduleSet};
pub use segment::{ActivitySegment, HeldSegment, MovementSegment, ScheduleSegment};
