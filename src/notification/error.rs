//! Notification sink error types.

use thiserror::Error;

/// Errors that can occur while presenting a notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The backend rejected or failed to deliver the notification.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// The desktop notification service cannot be reached.
    #[error("notification service is not available")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if the reminder schedule can continue without this notice.
    ///
    /// Notification failures never stop the schedule.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::SendFailed(_) => "check the system notification settings for this app",
            Self::NotAvailable => "run with --no-desktop-notifications to print reminders instead",
        }
    }
}
