//! Error types for chairside operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// A malformed duration, granularity, result cap, day count, or date.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A request envelope that is not valid JSON or has the wrong shape.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
