//! Global input monitor error types.

use thiserror::Error;

/// Errors raised when a global input source cannot start listening.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The platform hook is missing or not permitted.
    #[error("global input monitoring is not available: {0}")]
    Unavailable(String),

    /// The listener thread could not be started.
    #[error("failed to start input listener: {0}")]
    StartFailed(String),
}

impl InputError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => {
                "grant accessibility/input monitoring permission, or close the panel explicitly"
            }
            Self::StartFailed(_) => "restart the application",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InputError::Unavailable("no X11 display".to_string());
        assert!(err.to_string().contains("no X11 display"));
    }

    #[test]
    fn test_suggestion() {
        assert!(InputError::Unavailable(String::new())
            .suggestion()
            .contains("permission"));
    }
}
