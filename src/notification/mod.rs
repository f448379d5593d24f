//! Notification sink abstraction.
//!
//! The scheduler hands `(title, body, persistent)` triples to a
//! [`NotificationSink`]. Persistent notices stay until cleared; transient
//! notices should disappear after [`TRANSIENT_DISPLAY`].
//!
//! - [`DesktopNotificationSink`]: platform notifications via `notify-rust`
//! - [`LogNotificationSink`]: prints to stdout, for headless sessions
//! - [`MockNotificationSink`]: records notices for tests

pub mod content;
mod desktop;
pub mod error;

use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use self::content::{interval_updated_notice, reminder_notice, Notice, REMINDER_TITLE};
pub use self::desktop::DesktopNotificationSink;
pub use self::error::NotificationError;

/// How long a transient notice stays on screen.
pub const TRANSIENT_DISPLAY: Duration = Duration::from_secs(5);

/// Presents notices to the user.
pub trait NotificationSink: Send + Sync {
    /// Displays a notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice could not be handed to the backend.
    fn display(&self, title: &str, body: &str, persistent: bool) -> Result<(), NotificationError>;

    /// Removes every notice this application has shown.
    fn clear_all(&self);

    /// Displays a prepared [`Notice`].
    fn show(&self, notice: &Notice) -> Result<(), NotificationError> {
        self.display(&notice.title, &notice.body, notice.persistent)
    }
}

// ============================================================================
// LogNotificationSink
// ============================================================================

/// Prints notices to stdout instead of the desktop.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn display(&self, title: &str, body: &str, persistent: bool) -> Result<(), NotificationError> {
        tracing::info!(persistent, "notification: {}", title);
        println!("🔔 {}", title);
        println!("   {}", body);
        Ok(())
    }

    fn clear_all(&self) {}
}

// ============================================================================
// MockNotificationSink
// ============================================================================

#[derive(Debug, Default)]
struct MockSinkState {
    notices: Vec<Notice>,
    clear_count: usize,
    should_fail: bool,
}

/// Records notices instead of showing them.
///
/// Clones share the same record.
#[derive(Debug, Default, Clone)]
pub struct MockNotificationSink {
    state: Arc<Mutex<MockSinkState>>,
}

impl MockNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.state.lock().unwrap().should_fail = should_fail;
    }

    #[must_use]
    pub fn get_notices(&self) -> Vec<Notice> {
        self.state.lock().unwrap().notices.clone()
    }

    #[must_use]
    pub fn notice_count(&self) -> usize {
        self.state.lock().unwrap().notices.len()
    }

    /// Number of persistent notices recorded.
    #[must_use]
    pub fn persistent_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .notices
            .iter()
            .filter(|n| n.persistent)
            .count()
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.state.lock().unwrap().clear_count
    }

    pub fn clear_recorded(&self) {
        let mut state = self.state.lock().unwrap();
        state.notices.clear();
        state.clear_count = 0;
    }
}

impl NotificationSink for MockNotificationSink {
    fn display(&self, title: &str, body: &str, persistent: bool) -> Result<(), NotificationError> {
        let mut state = self.state.lock().unwrap();
        if state.should_fail {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        state.notices.push(Notice {
            title: title.to_string(),
            body: body.to_string(),
            persistent,
        });
        Ok(())
    }

    fn clear_all(&self) {
        self.state.lock().unwrap().clear_count += 1;
    }
}
