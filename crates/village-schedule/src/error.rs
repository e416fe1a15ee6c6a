use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Total duration is zero, or no segment gives the persona a position.
    #[error("schedule for {name:?} has no usable segments")]
    EmptySchedule { name: String },

    #[error("segment {index} is malformed: {reason}")]
    MalformedSegment { index: usize, reason: String },

    #[error("cannot project onto segments with zero total duration")]
    ZeroTotalDuration,

    #[error("persona name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("schedule set is full ({0} personas)")]
    TooManySchedules(usize),

    #[error("no valid schedules to run")]
    NoValidSchedules,

    #[error("schedule JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
