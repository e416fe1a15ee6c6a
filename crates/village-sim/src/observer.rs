//! Simulation observer trait for rendering and data collection.

use village_core::Tick;
use village_interaction::{DialogueOutcome, EndedSession, InteractionSession};
use village_mobility::AgentState;

/// What happened during one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    /// The tick that just completed.
    pub tick:              Tick,
    /// Simulated seconds since start, after this tick.
    pub elapsed_secs:      f64,
    /// Segment boundaries crossed.
    pub transitions:       usize,
    pub sessions_started:  usize,
    pub sessions_ended:    usize,
    /// Dialogue outcomes collected, successful or not.
    pub dialogues:         usize,
    /// Outcomes that carried an error.
    pub dialogue_failures: usize,
    /// Entries handed to the event log.
    pub log_entries:       usize,
}

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: position printer
///
/// ```rust,ignore
/// struct Printer;
///
/// impl SimObserver for Printer {
///     fn on_snapshot(&mut self, tick: Tick, agents: &[AgentState]) {
///         for a in agents {
///             println!("{tick} {} at ({:.1}, {:.1})", a.name, a.position.x, a.position.y);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the clock advances.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per meeting, after both agents are marked interacting.
    fn on_session_started(&mut self, _session: &InteractionSession) {}

    /// Called when a session expires, is closed, or is cleared by `stop`.
    fn on_session_ended(&mut self, _ended: &EndedSession) {}

    /// Called for every dialogue outcome collected this tick, including
    /// failures and empty replies.
    fn on_dialogue(&mut self, _outcome: &DialogueOutcome) {}

    /// Called every tick with read-only agent state, indexed by `AgentId`.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[AgentState]) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Called once when the simulation stops.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
