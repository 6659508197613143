//! Errors raised while acquiring, decoding and projecting a lesson feed.

use thiserror::Error;

/// Errors that can occur in the schedule pipeline.
///
/// None of these are fatal: a transport failure leaves the previously loaded
/// feed in place and a malformed timestamp only removes the offending event.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("feed could not be retrieved: {0}")]
    TransportFailure(String),

    #[error("malformed timestamp '{0}'")]
    MalformedTimestamp(String),

    #[error("week offset {0} is out of range")]
    InvalidWeekOffset(i64),

    #[error("invalid grid configuration: {0}")]
    InvalidGridConfig(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ScheduleError {
    fn from(err: reqwest::Error) -> Self {
        ScheduleError::TransportFailure(err.to_string())
    }
}

impl From<std::io::Error> for ScheduleError {
    fn from(err: std::io::Error) -> Self {
        ScheduleError::Storage(err.to_string())
    }
}

/// Result type alias for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
