//! The `AgentStore`: per-agent state and schedule clocks.

use village_core::AgentId;
use village_schedule::ScheduleSet;

use crate::{AgentClock, AgentState, MobilityError, MobilityResult, StepPlan, Transition};

/// Runtime state for every agent of a run.
///
/// Both vectors are indexed by `AgentId` and always have the same length as
/// the `ScheduleSet` the store was spawned from.
#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    pub states: Vec<AgentState>,
    pub clocks: Vec<AgentClock>,
}

impl AgentStore {
    /// One free agent per schedule, standing on its spawn tile with the
    /// segment active at local time 0 selected.
    pub fn spawn(set: &ScheduleSet) -> Self {
        let states: Vec<AgentState> = set
            .iter()
            .map(|(id, schedule)| {
                let first = schedule.project(0.0).segment_index;
                AgentState::spawned(id, schedule.name(), schedule.spawn_tile(), first)
            })
            .collect();
        let clocks = vec![AgentClock::default(); states.len()];
        Self { states, clocks }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&AgentState> {
        self.states.get(agent.index())
    }

    /// Schedule-local time of `agent` at global time `now`.
    #[inline]
    pub fn local_secs(&self, agent: AgentId, now: f64) -> f64 {
        self.clocks
            .get(agent.index())
            .map_or(now, |clock| clock.local_secs(now))
    }

    /// Write a plan back and report the segment boundary it crossed, if any.
    ///
    /// Plans for unknown agents are ignored.
    pub fn apply(&mut self, plan: &StepPlan) -> Option<Transition> {
        let state = self.states.get_mut(plan.agent.index())?;

        let p = &plan.projection;
        let transition = (state.current_segment_index != p.segment_index || state.cycle != p.cycle)
            .then_some(Transition {
                agent:     plan.agent,
                completed: state.current_segment_index,
                started:   p.segment_index,
                cycle:     p.cycle,
            });

        state.position = plan.placement.position;
        if let Some(direction) = plan.placement.direction {
            state.direction = direction;
        }
        state.is_moving = plan.placement.is_moving;
        state.current_segment_index = p.segment_index;
        state.cycle = p.cycle;

        transition
    }

    // ── Interaction flags ─────────────────────────────────────────────────

    /// Pair `a` with `b` at global time `now`: set both interaction flags,
    /// stop both agents, and freeze both clocks.
    pub fn begin_interaction(&mut self, a: AgentId, b: AgentId, now: f64) -> MobilityResult<()> {
        if a == b {
            return Err(MobilityError::SelfInteraction(a));
        }
        for agent in [a, b] {
            let state = self.states.get(agent.index()).ok_or(MobilityError::UnknownAgent(agent))?;
            if state.is_interacting {
                return Err(MobilityError::AlreadyInteracting(agent));
            }
        }
        for (agent, partner) in [(a, b), (b, a)] {
            let i = agent.index();
            self.states[i].is_interacting = true;
            self.states[i].interacting_with = Some(partner);
            self.states[i].is_moving = false;
            self.clocks[i].freeze(now);
        }
        Ok(())
    }

    /// Release `agent` from its interaction and restart its clock at `now`.
    ///
    /// Releasing a free agent is a no-op.
    pub fn end_interaction(&mut self, agent: AgentId, now: f64) -> MobilityResult<()> {
        let i = agent.index();
        let state = self.states.get_mut(i).ok_or(MobilityError::UnknownAgent(agent))?;
        state.is_interacting = false;
        state.interacting_with = None;
        self.clocks[i].thaw(now);
        Ok(())
    }

    /// Agents not currently interacting.
    #[cfg(test)]
    pub(crate) fn free_agents(&self) -> impl Iterator<Item = &AgentState> + '_ {
        self.states.iter().filter(|s| !s.is_interacting)
    }
}
