//! Core data types for the Standing Desk Timer.
//!
//! This module defines the data structures used for:
//! - The reminder interval and its validation/default policy
//! - Dismiss controller monitoring state
//! - Status snapshots shared with the CLI

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Interval used when nothing valid is stored or requested.
pub const DEFAULT_INTERVAL_HOURS: f64 = 1.0;

/// Upper bound of the interval slider.
pub const SLIDER_MAX_HOURS: f64 = 4.0;

/// Slider values are truncated to tenths of an hour.
const SLIDER_STEPS_PER_HOUR: f64 = 10.0;

/// Absorbs binary representation error (e.g. 2.3 * 10 = 22.999...).
const TRUNCATION_EPSILON: f64 = 1e-9;

const SECONDS_PER_HOUR: f64 = 3600.0;

// ============================================================================
// IntervalError
// ============================================================================

/// Reasons a requested interval is rejected.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum IntervalError {
    /// Zero or negative hours.
    #[error("interval must be positive, got {0} hours")]
    NotPositive(f64),

    /// NaN or infinity.
    #[error("interval must be a finite number of hours")]
    NotFinite,
}

// ============================================================================
// Interval
// ============================================================================

/// Hours between two reminders.
///
/// Always finite and strictly positive. Values that fail validation are
/// replaced by [`DEFAULT_INTERVAL_HOURS`] through [`Interval::or_default`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Interval(f64);

impl Interval {
    /// Validates a number of hours.
    ///
    /// # Errors
    ///
    /// Returns [`IntervalError`] for non-finite or non-positive values.
    pub fn new(hours: f64) -> Result<Self, IntervalError> {
        if !hours.is_finite() {
            return Err(IntervalError::NotFinite);
        }
        if hours <= 0.0 {
            return Err(IntervalError::NotPositive(hours));
        }
        Ok(Self(hours))
    }

    /// Validates `hours`, substituting the default interval on failure.
    pub fn or_default(hours: f64) -> Self {
        match Self::new(hours) {
            Ok(interval) => interval,
            Err(e) => {
                tracing::warn!(
                    requested = hours,
                    default = DEFAULT_INTERVAL_HOURS,
                    "invalid interval, using default: {}",
                    e
                );
                Self::default()
            }
        }
    }

    /// Interval for a value read from the settings store.
    ///
    /// Absent and non-positive values resolve to the default.
    pub fn from_stored(stored: Option<f64>) -> Self {
        match stored {
            Some(hours) => Self::or_default(hours),
            None => Self::default(),
        }
    }

    /// Interval for a raw slider position, truncated to one decimal place.
    pub fn from_slider(raw: f64) -> Self {
        Self::or_default(truncate_to_tenths(raw))
    }

    /// Number of hours.
    pub fn hours(&self) -> f64 {
        self.0
    }

    /// The interval as a `Duration`, saturating at `Duration::MAX`.
    pub fn as_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.0 * SECONDS_PER_HOUR).unwrap_or(Duration::MAX)
    }

    /// Unit word for messages: "hour" for exactly one hour, else "hours".
    pub fn unit(&self) -> &'static str {
        if self.0 == 1.0 {
            "hour"
        } else {
            "hours"
        }
    }

    /// Slider label, e.g. `every 1.5 hours`.
    pub fn label(&self) -> String {
        format!("every {} hours", self)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self(DEFAULT_INTERVAL_HOURS)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truncates a continuous slider value to tenths: `floor(v * 10) / 10`.
pub fn truncate_to_tenths(raw: f64) -> f64 {
    ((raw * SLIDER_STEPS_PER_HOUR) + TRUNCATION_EPSILON).floor() / SLIDER_STEPS_PER_HOUR
}

// ============================================================================
// MonitorState
// ============================================================================

/// Whether the dismiss controller is listening for outside clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    /// No monitoring session
    #[default]
    Idle,
    /// Global pointer presses close the surface
    Monitoring,
}

impl MonitorState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorState::Idle => "idle",
            MonitorState::Monitoring => "monitoring",
        }
    }
}

// ============================================================================
// HideReason
// ============================================================================

/// Why the transient display surface is being hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    /// A pointer press outside the surface
    OutsideClick,
    /// The user closed or toggled the surface
    Explicit,
    /// The application is quitting
    Quit,
}

impl fmt::Display for HideReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HideReason::OutsideClick => write!(f, "outside_click"),
            HideReason::Explicit => write!(f, "explicit"),
            HideReason::Quit => write!(f, "quit"),
        }
    }
}

// ============================================================================
// ReminderSnapshot
// ============================================================================

/// Point-in-time view of the scheduler for status output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderSnapshot {
    /// Configured interval in hours
    #[serde(rename = "intervalHours")]
    pub interval_hours: f64,
    /// Whole seconds until the next reminder (0 when nothing is armed)
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u64,
    /// Whether a reminder is armed
    pub armed: bool,
}

impl ReminderSnapshot {
    /// Builds a snapshot from an interval and the remaining time.
    pub fn new(interval: Interval, remaining: Duration, armed: bool) -> Self {
        Self {
            interval_hours: interval.hours(),
            remaining_seconds: remaining.as_secs(),
            armed,
        }
    }

    /// Interval to display; a malformed value shows as the default.
    pub fn interval(&self) -> Interval {
        Interval::or_default(self.interval_hours)
    }

    /// Remaining time formatted as `H:MM:SS`.
    pub fn remaining_hms(&self) -> String {
        format_hms(Duration::from_secs(self.remaining_seconds))
    }

    /// One-line countdown status.
    pub fn status_line(&self) -> String {
        if !self.armed {
            return format!("no reminder armed ({})", self.interval().label());
        }
        format!(
            "next reminder in {} ({})",
            self.remaining_hms(),
            self.interval().label()
        )
    }
}

/// Formats a duration as `H:MM:SS`, dropping fractions of a second.
pub fn format_hms(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

// ============================================================================
// Tests
// ============================================================================
