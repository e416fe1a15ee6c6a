//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use tracing::{info, warn};

use village_core::{AgentId, EngineConfig, SessionId, SimClock};
use village_interaction::{
    DialogueDispatcher, DialogueOutcome, DialogueRequest, DialogueService, EndedSession,
    InteractionSession, ProximityDetector, SessionManager,
};
use village_mobility::{plan_step, AgentState, AgentStore, MobilityError, StepPlan, Transition};
use village_output::{EventLog, LogEntry, LogPhase, LogStats};
use village_schedule::{ScheduleError, ScheduleSet};
use village_spatial::TileMap;

use crate::{NoopObserver, SimError, SimObserver, SimResult, TickSummary};

/// Outcome of [`Sim::start`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StartReport {
    pub agents:        usize,
    /// Activity locations and path points outside the tile map.
    pub off_map_tiles: usize,
}

// ── Run ───────────────────────────────────────────────────────────────────────

/// Everything that lives from `start` to `stop`.
pub(crate) struct Run {
    schedules:           ScheduleSet,
    pub(crate) agents:   AgentStore,
    proximity:           ProximityDetector,
    pub(crate) sessions: SessionManager,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Each [`tick`](Sim::tick) runs these phases in order:
///
/// 1. **Clock**: advance by the requested simulated seconds.
/// 2. **Dialogue**: collect finished dialogue calls; successful replies
///    become `conversation` entries for both participants.
/// 3. **Expiry**: end sessions whose timeout has passed and thaw their
///    agents' clocks.
/// 4. **Projection** (optionally parallel with the `parallel` feature):
///    plan every free agent from its schedule and frozen-offset clock.
///    Read-only over schedules and state.
/// 5. **Apply** (sequential, ascending `AgentId`): write plans back and log
///    `completed` then `started` for every segment boundary crossed.
/// 6. **Proximity**: detect new meetings on the updated snapshot, open a
///    session per meeting, freeze both agents, and dispatch the dialogue
///    call without waiting for it.
/// 7. **Commit**: hand the tick's log entries to the event log.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<D: DialogueService> {
    /// Engine configuration (time scale, timeouts, retry policy, …).
    pub config: EngineConfig,

    /// Simulated time since `start`.
    pub clock: SimClock,

    pub(crate) map:      Option<Arc<TileMap>>,
    pub(crate) dialogue: DialogueDispatcher<D>,
    pub(crate) log:      EventLog,
    pub(crate) run:      Option<Run>,
}

impl<D: DialogueService> Sim<D> {
    // ── Control surface ───────────────────────────────────────────────────

    /// Spawn one agent per schedule and reset the clock to second 0.
    ///
    /// Logs a `started` entry for the segment each agent begins in.  Map
    /// problems are warned about and counted, never fatal.
    pub fn start(&mut self, schedules: ScheduleSet) -> SimResult<StartReport> {
        if self.run.is_some() {
            return Err(SimError::AlreadyRunning);
        }
        if schedules.is_empty() {
            return Err(ScheduleError::NoValidSchedules.into());
        }

        self.clock.reset();
        let off_map_tiles = self.map.as_deref().map_or(0, |map| count_off_map(map, &schedules));
        let agents = AgentStore::spawn(&schedules);

        let at = self.clock.current_unix_secs();
        for state in &agents.states {
            let entry = schedules
                .get(state.id)
                .and_then(|s| s.segment(state.current_segment_index))
                .and_then(|seg| LogEntry::boundary(state.id, &state.name, at, LogPhase::Started, seg));
            if let Some(entry) = entry {
                self.log.record(entry);
            }
        }

        let report = StartReport { agents: agents.len(), off_map_tiles };
        info!(agents = report.agents, off_map_tiles, "simulation started");

        self.run = Some(Run {
            schedules,
            agents,
            proximity: ProximityDetector::new(self.config.proximity_index_threshold),
            sessions:  SessionManager::new(self.config.interaction_timeout_secs),
        });
        Ok(report)
    }

    /// Advance the simulation by `elapsed_secs` simulated seconds.
    ///
    /// Zero is a valid step: it re-evaluates proximity and collects dialogue
    /// without moving anyone.
    pub fn tick<O: SimObserver>(&mut self, elapsed_secs: f64, observer: &mut O) -> SimResult<TickSummary> {
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            return Err(SimError::InvalidStep(elapsed_secs));
        }
        let Some(run) = self.run.as_mut() else {
            return Err(SimError::NotRunning);
        };

        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);
        let now = self.clock.advance(elapsed_secs);
        let at = self.clock.current_unix_secs();

        let mut summary = TickSummary { tick, elapsed_secs: now, ..TickSummary::default() };
        let mut entries = Vec::new();

        // ── Dialogue outcomes ─────────────────────────────────────────────
        for outcome in self.dialogue.drain() {
            summary.dialogues += 1;
            if outcome.result.is_err() {
                summary.dialogue_failures += 1;
            }
            run.conversation_entries(&outcome, self.map.as_deref(), at, &mut entries);
            observer.on_dialogue(&outcome);
        }

        // ── Session expiry ────────────────────────────────────────────────
        for ended in run.sessions.expire(now) {
            run.release(&ended, now);
            summary.sessions_ended += 1;
            observer.on_session_ended(&ended);
        }

        // ── Projection (read-only) and apply ──────────────────────────────
        let plans = run.plan(now);
        for plan in &plans {
            if let Some(transition) = run.agents.apply(plan) {
                summary.transitions += 1;
                run.boundary_entries(transition, at, &mut entries);
            }
        }

        // ── Proximity ─────────────────────────────────────────────────────
        for (a, b) in run.proximity.detect(&run.agents.states) {
            match run.meet(a, b, now, at) {
                Ok((session, request)) => {
                    self.dialogue.dispatch(session.id, request);
                    summary.sessions_started += 1;
                    observer.on_session_started(&session);
                }
                Err(e) => warn!(a = %a, b = %b, error = %e, "meeting skipped"),
            }
        }

        // ── Commit ────────────────────────────────────────────────────────
        summary.log_entries = entries.len();
        self.log.record_all(entries);

        observer.on_snapshot(tick, &run.agents.states);
        observer.on_tick_end(&summary);
        Ok(summary)
    }

    /// Run `n` ticks of `config.tick_secs` each.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(self.config.tick_secs, observer)?;
        }
        Ok(())
    }

    /// Stop the run: abort in-flight dialogue calls and end every session.
    ///
    /// Returns the sessions that were ended.  Stopping a stopped simulation
    /// is a no-op.  The event log stays open; see [`shutdown`](Sim::shutdown).
    pub fn stop(&mut self) -> Vec<EndedSession> {
        self.stop_with(&mut NoopObserver)
    }

    /// [`stop`](Sim::stop), reporting ended sessions and the end of the run
    /// to `observer`.
    pub fn stop_with<O: SimObserver>(&mut self, observer: &mut O) -> Vec<EndedSession> {
        let cancelled = self.dialogue.cancel_all();
        let Some(mut run) = self.run.take() else {
            return Vec::new();
        };

        let now = self.clock.elapsed_secs;
        let ended = run.sessions.clear(now);
        for e in &ended {
            observer.on_session_ended(e);
        }
        info!(tick = %self.clock.current_tick, sessions = ended.len(), cancelled, "simulation stopped");
        observer.on_sim_end(self.clock.current_tick);
        ended
    }

    /// End session `id` now and release both agents.
    ///
    /// An in-flight dialogue call for the session is not cancelled; its
    /// reply is still logged when it arrives.
    pub fn close_session(&mut self, id: SessionId) -> SimResult<EndedSession> {
        let run = self.run.as_mut().ok_or(SimError::NotRunning)?;
        let now = self.clock.elapsed_secs;
        let ended = run.sessions.close(id, now)?;
        run.release(&ended, now);
        Ok(ended)
    }

    /// Stop, then wait for the event log to drain.
    pub async fn shutdown(&mut self) -> LogStats {
        self.stop();
        let stats = self.log.close().await;
        info!(
            recorded  = stats.recorded,
            persisted = stats.persisted,
            retried   = stats.retried,
            dropped   = stats.dropped,
            "event log closed"
        );
        stats
    }

    // ── Read-only access ──────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Agent states indexed by `AgentId`.  Empty while stopped.
    pub fn agents(&self) -> &[AgentState] {
        match &self.run {
            Some(run) => &run.agents.states,
            None => &[],
        }
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentState> {
        self.run.as_ref()?.agents.get(id)
    }

    pub fn agent_by_name(&self, name: &str) -> Option<&AgentState> {
        let run = self.run.as_ref()?;
        run.agents.get(run.schedules.id_of(name)?)
    }

    pub fn schedules(&self) -> Option<&ScheduleSet> {
        self.run.as_ref().map(|run| &run.schedules)
    }

    /// Active sessions in id order.
    pub fn sessions(&self) -> impl Iterator<Item = &InteractionSession> + '_ {
        self.run.iter().flat_map(|run| run.sessions.iter())
    }

    pub fn session_of(&self, agent: AgentId) -> Option<&InteractionSession> {
        self.run.as_ref()?.sessions.session_of(agent)
    }

    /// Whether `a` and `b` must separate before they can meet again.
    pub fn is_latched(&self, a: AgentId, b: AgentId) -> bool {
        self.run.as_ref().is_some_and(|run| run.proximity.is_latched(a, b))
    }

    pub fn tile_map(&self) -> Option<&TileMap> {
        self.map.as_deref()
    }

    pub fn log_stats(&self) -> LogStats {
        self.log.stats()
    }

    /// Dialogue calls dispatched but not yet collected.
    pub fn dialogue_in_flight(&self) -> usize {
        self.dialogue.in_flight()
    }

    pub fn dialogue_service(&self) -> &D {
        self.dialogue.service()
    }
}

// ── Tick phases ───────────────────────────────────────────────────────────────

impl Run {
    /// Plan every free agent at global time `now`.
    ///
    /// Plans come back in ascending `AgentId` order with or without the
    /// `parallel` feature.
    fn plan(&self, now: f64) -> Vec<StepPlan> {
        let schedules = &self.schedules;
        let agents = &self.agents;
        let step = |state: &AgentState| -> Option<StepPlan> {
            if state.is_interacting {
                return None;
            }
            let schedule = schedules.get(state.id)?;
            Some(plan_step(schedule, state, agents.local_secs(state.id, now)))
        };

        #[cfg(not(feature = "parallel"))]
        {
            agents.states.iter().filter_map(step).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            agents.states.par_iter().filter_map(step).collect()
        }
    }

    /// `completed` entry for the segment left, then `started` for the one
    /// entered.  `Hold` segments produce nothing.
    fn boundary_entries(&self, t: Transition, at: i64, out: &mut Vec<LogEntry>) {
        let (Some(schedule), Some(state)) = (self.schedules.get(t.agent), self.agents.get(t.agent)) else {
            return;
        };
        for (phase, index) in [(LogPhase::Completed, t.completed), (LogPhase::Started, t.started)] {
            let entry = schedule
                .segment(index)
                .and_then(|seg| LogEntry::boundary(t.agent, &state.name, at, phase, seg));
            out.extend(entry);
        }
    }

    /// One `conversation` entry per participant for a non-empty reply.
    fn conversation_entries(
        &self,
        outcome: &DialogueOutcome,
        map:     Option<&TileMap>,
        at:      i64,
        out:     &mut Vec<LogEntry>,
    ) {
        let reply = match &outcome.result {
            Ok(reply) if reply.content.is_empty() => return,
            Ok(reply) => reply,
            Err(e) => {
                warn!(session = %outcome.session, error = %e, "dialogue failed");
                return;
            }
        };
        for agent in outcome.request.agents {
            let (Some(state), Some(other)) = (self.agents.get(agent), outcome.request.other_name(agent)) else {
                continue;
            };
            let tile = state.tile();
            let zone = map
                .and_then(|m| m.zone_name_at(tile))
                .or_else(|| self.segment_zone(state))
                .unwrap_or_default();
            out.push(LogEntry::conversation(agent, &state.name, at, other, tile, zone, &reply.content));
        }
    }

    fn segment_zone(&self, state: &AgentState) -> Option<&str> {
        let schedule = self.schedules.get(state.id)?;
        schedule.segment(state.current_segment_index).map(|seg| seg.start_zone())
    }

    /// Open a session for `a` and `b` and freeze both agents.
    ///
    /// The request captures both agents as they were when they met.
    pub(crate) fn meet(
        &mut self,
        a: AgentId,
        b: AgentId,
        now: f64,
        at: i64,
    ) -> SimResult<(InteractionSession, DialogueRequest)> {
        let request = self.request(a, b, at)?;
        let session = self.sessions.open(a, b, now)?.clone();
        if let Err(e) = self.agents.begin_interaction(a, b, now) {
            if let Err(rollback) = self.sessions.close(session.id, now) {
                warn!(session = %session.id, error = %rollback, "session rollback failed");
            }
            return Err(e.into());
        }
        Ok((session, request))
    }

    fn request(&self, a: AgentId, b: AgentId, at: i64) -> SimResult<DialogueRequest> {
        let sa = self.agents.get(a).ok_or(MobilityError::UnknownAgent(a))?;
        let sb = self.agents.get(b).ok_or(MobilityError::UnknownAgent(b))?;
        Ok(DialogueRequest {
            agents:       [a, b],
            participants: [sa.name.clone(), sb.name.clone()],
            positions:    [sa.position, sb.position],
            states:       [sa.motion(), sb.motion()],
            triggered_at: at,
        })
    }

    /// Clear both participants' interaction flags and restart their clocks.
    fn release(&mut self, ended: &EndedSession, now: f64) {
        let (a, b) = ended.session.participants;
        for agent in [a, b] {
            if let Err(e) = self.agents.end_interaction(agent, now) {
                warn!(agent = %agent, error = %e, "release failed");
            }
        }
    }
}

/// Count schedule tiles outside `map`, warning once per offending segment.
fn count_off_map(map: &TileMap, schedules: &ScheduleSet) -> usize {
    let mut count = 0;
    for (_, schedule) in schedules.iter() {
        for (index, segment) in schedule.segments().iter().enumerate() {
            let outside = segment.tiles().iter().filter(|&&tile| !map.contains(tile)).count();
            if outside > 0 {
                warn!(persona = schedule.name(), segment = index, tiles = outside, "segment leaves the map");
                count += outside;
            }
        }
    }
    count
}
