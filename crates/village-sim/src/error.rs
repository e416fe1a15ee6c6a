use thiserror::Error;

use village_core::CoreError;
use village_interaction::InteractionError;
use village_mobility::MobilityError;
use village_schedule::ScheduleError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("no tokio runtime: call inside a runtime or pass one to SimBuilder::runtime")]
    NoRuntime,

    #[error("simulation is already running")]
    AlreadyRunning,

    #[error("simulation is not running")]
    NotRunning,

    #[error("invalid step of {0} simulated seconds")]
    InvalidStep(f64),

    #[error("interaction error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("mobility error: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
