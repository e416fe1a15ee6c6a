//! `village-interaction`: agents meeting each other.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`proximity`] | `ProximityDetector`: adjacency scan plus the pair latch      |
//! | [`session`]   | `SessionManager`, `InteractionSession`, `SessionEnd`          |
//! | [`dialogue`]  | `DialogueService` trait, `NoopDialogue`, request/reply types  |
//! | [`dispatch`]  | `DialogueDispatcher`: detached dialogue tasks on tokio       |
//! | [`error`]     | `InteractionError`, `DialogueError`                           |
//!
//! # Lifecycle of a meeting
//!
//! ```text
//! tick N   : ProximityDetector::detect → (a, b) adjacent, both free, not latched
//!            SessionManager::open      → session s, expires_at = now + timeout
//!            DialogueDispatcher::dispatch(s, request)   (never awaited by the tick)
//! tick N+k : DialogueDispatcher::drain → reply for s (if it arrived)
//! tick N+m : SessionManager::expire    → s ended (Expired)
//! later    : a and b separate to distance > 1 → latch released
//! ```
//!
//! The latch is what stops a pair that stays adjacent after its session ends
//! from immediately meeting again.

pub mod dialogue;
pub mod dispatch;
pub mod error;
pub mod proximity;
pub mod session;

#[cfg(test)]
mod tests;

pub use dialogue::{DialogueReply, DialogueRequest, DialogueService, NoopDialogue};
pub use dispatch::{DialogueDispatcher, DialogueOutcome};
pub use error::{DialogueError, DialogueResult, InteractionError, InteractionResult};
pub use proximity::{pair_key, ProximityDetector};
pub use session::{EndedSession, InteractionSession, SessionEnd, SessionManager};
