//! `Schedule` (one persona's cyclic day) and `ScheduleSet` (all personas).

use std::collections::HashMap;

use village_core::{AgentId, TileCoord};

use crate::projector::project_with_total;
use crate::{Projection, ScheduleError, ScheduleResult, ScheduleSegment};

// ── Schedule ──────────────────────────────────────────────────────────────────

/// A persona's ordered, cyclic list of segments.
///
/// Construction guarantees a positive total duration and at least one
/// positioned (non-`Hold`) segment, so projection and spawning never fail.
#[derive(Clone, Debug)]
pub struct Schedule {
    name:          String,
    wake_up_time:  Option<String>,
    segments:      Vec<ScheduleSegment>,
    /// Segment durations, kept alongside for projection.
    durations:     Vec<u32>,
    total_secs:    u64,
    spawn:         TileCoord,
}

impl Schedule {
    /// Validate `segments` and build a schedule.
    ///
    /// Every segment must pass [`ScheduleSegment::validate`].  The schedule
    /// must contain at least one `Activity` or `Movement`.
    pub fn new(name: impl Into<String>, segments: Vec<ScheduleSegment>) -> ScheduleResult<Self> {
        let name = name.into();
        for (i, segment) in segments.iter().enumerate() {
            segment.validate(i)?;
        }

        let spawn = segments
            .iter()
            .find_map(ScheduleSegment::start_tile)
            .ok_or_else(|| ScheduleError::EmptySchedule { name: name.clone() })?;

        let durations: Vec<u32> = segments.iter().map(ScheduleSegment::duration_secs).collect();
        let total_secs = durations.iter().map(|&d| d as u64).sum();

        Ok(Self { name, wake_up_time: None, segments, durations, total_secs, spawn })
    }

    /// Attach the persona's wake-up time.  Kept verbatim; the engine never
    /// interprets it.
    pub fn with_wake_up_time(mut self, wake_up_time: impl Into<String>) -> Self {
        self.wake_up_time = Some(wake_up_time.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wake_up_time(&self) -> Option<&str> {
        self.wake_up_time.as_deref()
    }

    pub fn segments(&self) -> &[ScheduleSegment] {
        &self.segments
    }

    #[inline]
    pub fn segment(&self, index: usize) -> Option<&ScheduleSegment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Length of one cycle in simulated seconds.  Always positive.
    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    /// Start tile of the first positioned segment.
    pub fn spawn_tile(&self) -> TileCoord {
        self.spawn
    }

    /// Where the schedule stands after `t_secs` simulated seconds.
    #[inline]
    pub fn project(&self, t_secs: f64) -> Projection {
        project_with_total(&self.durations, self.total_secs, t_secs)
    }
}

// ── ScheduleSet ───────────────────────────────────────────────────────────────

/// All personas of one run, in insertion order.
///
/// The position of a schedule in the set is its `AgentId`.  The set is
/// read-only once handed to the simulation.
#[derive(Clone, Debug, Default)]
pub struct ScheduleSet {
    schedules: Vec<Schedule>,
    by_name:   HashMap<String, AgentId>,
}

impl ScheduleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a schedule and return the `AgentId` it will run as.
    ///
    /// Names must be unique within a set.
    pub fn insert(&mut self, schedule: Schedule) -> ScheduleResult<AgentId> {
        if self.by_name.contains_key(schedule.name()) {
            return Err(ScheduleError::DuplicateName(schedule.name.clone()));
        }
        let id = AgentId::try_from(self.schedules.len())
            .map_err(|_| ScheduleError::TooManySchedules(self.schedules.len()))?;
        self.by_name.insert(schedule.name.clone(), id);
        self.schedules.push(schedule);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&Schedule> {
        self.schedules.get(agent.index())
    }

    pub fn id_of(&self, name: &str) -> Option<AgentId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Schedule> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Iterate `(AgentId, &Schedule)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Schedule)> + '_ {
        self.schedules
            .iter()
            .enumerate()
            .map(|(i, s)| (AgentId(i as u32), s))
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }
}
