//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use tokio::runtime::Handle;

use village_core::{EngineConfig, RetryConfig, SimClock};
use village_interaction::{DialogueDispatcher, DialogueService};
use village_output::{DiscardLogStore, EventLog, LogStore};
use village_spatial::TileMap;

use crate::{Sim, SimError, SimResult};

type SpawnLog = Box<dyn FnOnce(RetryConfig, u64, &Handle) -> EventLog>;

/// Fluent builder for [`Sim<D>`].
///
/// # Required inputs
///
/// - [`EngineConfig`]: time scale, session timeout, retry policy, …
/// - `D: DialogueService`: the collaborator called when two agents meet
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                          |
/// |-------------------|--------------------------------------------------|
/// | `.tile_map(m)`    | none: no off-map check, zones from segments only |
/// | `.log_store(s)`   | `DiscardLogStore`                                |
/// | `.runtime(h)`     | `Handle::try_current()`                          |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, NoopDialogue)
///     .tile_map(map)
///     .log_store(MemoryLogStore::new())
///     .build()?;
/// sim.start(schedules)?;
/// sim.run_ticks(60, &mut NoopObserver)?;
/// ```
pub struct SimBuilder<D: DialogueService> {
    config:    EngineConfig,
    dialogue:  Arc<D>,
    map:       Option<Arc<TileMap>>,
    spawn_log: Option<SpawnLog>,
    runtime:   Option<Handle>,
}

impl<D: DialogueService> SimBuilder<D> {
    pub fn new(config: EngineConfig, dialogue: D) -> Self {
        Self::with_shared_dialogue(config, Arc::new(dialogue))
    }

    /// Like [`new`](Self::new) for a service the host also keeps a handle to.
    pub fn with_shared_dialogue(config: EngineConfig, dialogue: Arc<D>) -> Self {
        Self {
            config,
            dialogue,
            map:       None,
            spawn_log: None,
            runtime:   None,
        }
    }

    /// Map used for the start-up sanity check and conversation zones.
    pub fn tile_map(mut self, map: impl Into<Arc<TileMap>>) -> Self {
        self.map = Some(map.into());
        self
    }

    /// Where log entries are persisted.
    pub fn log_store<S: LogStore>(mut self, store: S) -> Self {
        self.spawn_log = Some(Box::new(move |retry, seed, runtime| {
            EventLog::spawn(store, retry, seed, runtime)
        }));
        self
    }

    /// Runtime that hosts dialogue calls and the log writer.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Validate the configuration, spawn the log writer, and return a
    /// stopped [`Sim`].
    pub fn build(self) -> SimResult<Sim<D>> {
        self.config.validate()?;

        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| SimError::NoRuntime)?,
        };

        let spawn_log = self.spawn_log.unwrap_or_else(|| {
            Box::new(|retry, seed, runtime| EventLog::spawn(DiscardLogStore, retry, seed, runtime))
        });
        let log = spawn_log(self.config.log_retry, self.config.seed, &runtime);

        Ok(Sim {
            clock:    SimClock::new(self.config.start_unix_secs),
            config:   self.config,
            map:      self.map,
            dialogue: DialogueDispatcher::new(self.dialogue, runtime),
            log,
            run:      None,
        })
    }
}
