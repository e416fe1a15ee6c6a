use village_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MobilityError {
    #[error("agent {0} does not exist")]
    UnknownAgent(AgentId),

    #[error("agent {0} is already interacting")]
    AlreadyInteracting(AgentId),

    #[error("agent cannot interact with itself ({0})")]
    SelfInteraction(AgentId),
}

pub type MobilityResult<T> = Result<T, MobilityError>;
