//! `village-sim`: tick loop orchestrator for the village simulation.
//!
//! # Tick loop
//!
//! ```text
//! start(schedules):  spawn agents at their first positioned tile,
//!                    log `started` for the segment active at t = 0
//!
//! tick(dt):
//!   ① Clock     : elapsed += dt
//!   ② Dialogue  : drain finished calls → `conversation` entries
//!   ③ Expiry    : end sessions with expires_at <= now, thaw agents
//!   ④ Projection: plan_step for every free agent (parallel with `parallel`)
//!   ⑤ Apply     : write plans, log `completed` then `started` per boundary
//!   ⑥ Proximity : new meetings → session + freeze + detached dialogue call
//!   ⑦ Commit    : hand the tick's entries to the EventLog
//!
//! stop():            abort dialogue calls, end all sessions
//! ```
//!
//! Agent positions are a pure function of each agent's schedule-local time,
//! so any step size (including large jumps) lands every agent exactly where
//! its schedule says.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the projection phase on Rayon's thread pool.      |
//! | `fx-hash`  | FxHash for the proximity pair latch.                   |
//! | `sqlite`   | Enables `village_output::SqliteLogStore`.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use village_core::EngineConfig;
//! use village_interaction::NoopDialogue;
//! use village_output::MemoryLogStore;
//! use village_schedule::load_schedules_str;
//! use village_sim::{NoopObserver, SimBuilder};
//!
//! let loaded = load_schedules_str(json, config.time_scale)?;
//! let mut sim = SimBuilder::new(config, NoopDialogue)
//!     .log_store(MemoryLogStore::new())
//!     .build()?;
//! sim.start(loaded.set)?;
//! sim.run_ticks(3_600, &mut NoopObserver)?;
//! let stats = sim.shutdown().await;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use sim::{Sim, StartReport};
