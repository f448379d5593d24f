//! Timer primitive error types.

use thiserror::Error;

/// Errors raised when a timer cannot be armed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// No tokio runtime is reachable from the calling thread.
    #[error("no async runtime available to drive timers: {0}")]
    NoRuntime(String),

    /// `now + interval` does not fit in an `Instant`.
    #[error("deadline is too far in the future to schedule")]
    DeadlineOutOfRange,

    /// The timer backend refused the request.
    #[error("timer could not be armed: {0}")]
    ArmFailed(String),
}

impl ClockError {
    /// Returns true if the caller can keep running with its previous timer.
    ///
    /// Arming failures never invalidate an already armed timer.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NoRuntime(_) => "start the scheduler from inside the application runtime",
            Self::DeadlineOutOfRange => "choose a shorter interval",
            Self::ArmFailed(_) => "try again; the previous reminder is still active",
        }
    }
}
