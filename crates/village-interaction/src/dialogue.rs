//! The dialogue collaborator seam.
//!
//! When two agents meet the engine describes the meeting in a
//! [`DialogueRequest`] and hands it to a [`DialogueService`].  What happens on
//! the other side (an LLM, a script, a chat backend) is not the engine's
//! concern.  The call runs as a detached task; the tick loop never waits on it.

use std::future::Future;

use serde::Serialize;

use village_core::{AgentId, TilePos};
use village_mobility::Motion;

use crate::DialogueResult;

/// Outbound description of a meeting.
///
/// Serializes to the wire shape
/// `{ participants, positions, states, triggeredAt }`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueRequest {
    /// Participant ids, same order as every other array.
    #[serde(skip)]
    pub agents: [AgentId; 2],
    /// Participant names.
    pub participants: [String; 2],
    pub positions: [TilePos; 2],
    pub states: [Motion; 2],
    /// Unix timestamp of the meeting.
    pub triggered_at: i64,
}

impl DialogueRequest {
    /// Name of the participant other than `agent`.
    pub fn other_name(&self, agent: AgentId) -> Option<&str> {
        match self.agents {
            [a, _] if a == agent => Some(&self.participants[1]),
            [_, b] if b == agent => Some(&self.participants[0]),
            _ => None,
        }
    }
}

/// What came back from the collaborator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogueReply {
    /// Free-text conversation.  An empty reply is not logged.
    pub content: String,
}

impl DialogueReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

/// External dialogue collaborator.
///
/// Implementations must be cheap to share: the dispatcher holds one behind
/// an `Arc` and calls it from spawned tasks.
pub trait DialogueService: Send + Sync + 'static {
    fn converse(&self, request: DialogueRequest) -> impl Future<Output = DialogueResult<DialogueReply>> + Send;
}

/// A service that answers every meeting with an empty reply.
///
/// Useful for headless runs that only care about movement and session
/// bookkeeping.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDialogue;

impl DialogueService for NoopDialogue {
    fn converse(&self, _request: DialogueRequest) -> impl Future<Output = DialogueResult<DialogueReply>> + Send {
        std::future::ready(Ok(DialogueReply::default()))
    }
}
