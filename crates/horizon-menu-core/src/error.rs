//! Error types for Horizon Menu core primitives.

use std::fmt;

/// Scheduler-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The task ID is invalid, already fired, or already cancelled.
    InvalidTaskId,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTaskId => write!(f, "Invalid, fired or cancelled task ID"),
        }
    }
}

impl std::error::Error for SchedulerError {}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
