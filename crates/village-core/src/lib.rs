//! `village-core`: foundational types for the village simulation engine.
//!
//! This crate is a dependency of every other `village-*` crate.  It has no
//! `village-*` dependencies and few external ones (`rand`, `serde`,
//! `serde_json`, `thiserror`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `SessionId`, `ZoneId`                           |
//! | [`grid`]   | `TilePos` (continuous), `TileCoord` (integer), `Direction` |
//! | [`time`]   | `Tick`, `SimClock`                                         |
//! | [`config`] | `EngineConfig`, `RetryConfig`                              |
//! | [`rng`]    | `SimRng` (seeded, used for backoff jitter)                 |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |

pub mod config;
pub mod error;
pub mod grid;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, RetryConfig};
pub use error::{CoreError, CoreResult};
pub use grid::{Direction, TileCoord, TilePos};
pub use ids::{AgentId, SessionId, ZoneId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
