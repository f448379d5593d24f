//! Notification text construction.
//!
//! Builds the two notices the scheduler emits: the transient
//! "interval updated" notice and the persistent reminder.

use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};

use crate::types::Interval;

/// Title of the recurring reminder.
pub const REMINDER_TITLE: &str = "Your gentle reminder to transition 🤓";

/// Shown when the next alert time cannot be represented.
const UNKNOWN_TIME: &str = "later";

/// A notification ready to be handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Headline text
    pub title: String,
    /// Detail text
    pub body: String,
    /// Persistent notices stay until cleared; transient ones expire
    pub persistent: bool,
}

impl Notice {
    /// Creates a notice that stays until cleared.
    pub fn persistent(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            persistent: true,
        }
    }

    /// Creates a notice that clears itself shortly after display.
    pub fn transient(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            persistent: false,
        }
    }
}

/// Local wall-clock time `remaining` from now.
pub fn wall_time_after(remaining: Duration) -> Option<DateTime<Local>> {
    let delta = TimeDelta::from_std(remaining).ok()?;
    Local::now().checked_add_signed(delta)
}

/// Formats a wall-clock time as `h:mm AM`.
pub fn format_alert_time(time: Option<DateTime<Local>>) -> String {
    match time {
        Some(time) => time.format("%-I:%M %p").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// Transient notice confirming a new interval.
#[must_use]
pub fn interval_updated_notice(interval: Interval, next_alert: &str) -> Notice {
    Notice::transient(
        format!("⏰ Updated to every {} {}", interval, interval.unit()),
        format!("Next alert set for {}", next_alert),
    )
}

/// Persistent reminder emitted on each firing.
#[must_use]
pub fn reminder_notice(next_alert: &str) -> Notice {
    Notice::persistent(REMINDER_TITLE, format!("Next alert set for: {}", next_alert))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_interval_updated_singular() {
        let notice = interval_updated_notice(Interval::default(), "3:05 PM");
        assert_eq!(notice.title, "⏰ Updated to every 1 hour");
        assert_eq!(notice.body, "Next alert set for 3:05 PM");
        assert!(!notice.persistent);
    }

    #[test]
    fn test_interval_updated_plural() {
        let notice = interval_updated_notice(Interval::new(1.5).unwrap(), "3:35 PM");
        assert_eq!(notice.title, "⏰ Updated to every 1.5 hours");
    }

    #[test]
    fn test_reminder_notice() {
        let notice = reminder_notice("4:05 PM");
        assert_eq!(notice.title, REMINDER_TITLE);
        assert_eq!(notice.body, "Next alert set for: 4:05 PM");
        assert!(notice.persistent);
    }

    #[test]
    fn test_format_alert_time() {
        let time = Local.with_ymd_and_hms(2024, 3, 1, 15, 5, 0).single();
        assert_eq!(format_alert_time(time), "3:05 PM");

        let time = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single();
        assert_eq!(format_alert_time(time), "9:30 AM");
    }

    #[test]
    fn test_format_alert_time_unknown() {
        assert_eq!(format_alert_time(None), "later");
    }

    #[test]
    fn test_wall_time_after() {
        let before = Local::now();
        let time = wall_time_after(Duration::from_secs(3600)).unwrap();
        let delta = time - before;
        assert!(delta >= TimeDelta::seconds(3600));
        assert!(delta < TimeDelta::seconds(3660));
    }

    #[test]
    fn test_wall_time_after_overflow() {
        assert!(wall_time_after(Duration::MAX).is_none());
    }
}
