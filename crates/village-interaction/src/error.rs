use thiserror::Error;

use village_core::{AgentId, SessionId};

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("agent {0} is already in a session")]
    AgentBusy(AgentId),

    #[error("agent {0} cannot meet itself")]
    SelfPair(AgentId),

    #[error("no active session {0}")]
    UnknownSession(SessionId),
}

pub type InteractionResult<T> = Result<T, InteractionError>;

/// Failure reported by a dialogue collaborator.
///
/// None of these are retried: a second call could start a second
/// conversation for the same meeting.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DialogueError {
    #[error("dialogue service unavailable: {0}")]
    Unavailable(String),

    #[error("dialogue request rejected: {0}")]
    Rejected(String),

    #[error("dialogue cancelled")]
    Cancelled,
}

pub type DialogueResult<T> = Result<T, DialogueError>;
