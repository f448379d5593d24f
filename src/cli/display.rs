//! Display utilities for the standing desk timer CLI.
//!
//! This module provides formatted output for:
//! - Countdown and status lines
//! - Settings output
//! - Error messages

use std::path::Path;

use serde::Serialize;

use crate::types::{Interval, ReminderSnapshot};

// ============================================================================
// ConfigReport
// ============================================================================

/// Persisted settings as reported by `config show`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigReport {
    /// Settings file location
    pub path: String,
    /// Raw stored value, if any
    pub stored_hours: Option<f64>,
    /// Interval a new session would use
    pub interval_hours: f64,
}

impl ConfigReport {
    pub fn new(path: &Path, stored_hours: Option<f64>) -> Self {
        Self {
            path: path.display().to_string(),
            stored_hours,
            interval_hours: Interval::from_stored(stored_hours).hours(),
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Slider label, e.g. `every 1.5 hours`.
    pub fn interval_label(interval: Interval) -> String {
        interval.label()
    }

    /// Prints the current status.
    pub fn show_status(snapshot: &ReminderSnapshot) {
        println!("{}", snapshot.status_line());
    }

    /// Prints the persisted settings.
    pub fn show_config(report: &ConfigReport) {
        println!("Settings: {}", report.path);
        match report.stored_hours {
            Some(hours) => println!("Stored interval: {} hours", hours),
            None => println!("Stored interval: (not set)"),
        }
        println!(
            "Effective interval: {}",
            Self::interval_label(Interval::or_default(report.interval_hours))
        );
    }

    /// Prints the persisted settings as JSON.
    pub fn show_config_json(report: &ConfigReport) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(report)?);
        Ok(())
    }

    /// Shows a success message for `config set-interval`.
    pub fn show_interval_saved(interval: Interval, path: &Path) {
        println!("* Interval set to {}", Self::interval_label(interval));
        println!("  Saved to {}", path.display());
    }

    /// Prints the console command summary.
    pub fn show_console_help() {
        println!("Commands:");
        println!("  show | hide | toggle    control the timer panel");
        println!("  interval <hours>        set the interval (0.1 steps)");
        println!("  reset                   restart the countdown");
        println!("  status                  print the time remaining");
        println!("  click                   simulate a click outside the panel");
        println!("  quit                    exit");
    }

    /// Shows a warning message.
    pub fn show_warning(message: &str) {
        eprintln!("Warning: {}", message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Format Tests
    // ------------------------------------------------------------------------

    mod format_tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_interval_label() {
            assert_eq!(
                Display::interval_label(Interval::from_slider(1.37)),
                "every 1.3 hours"
            );
        }

        #[test]
        fn test_show_status_does_not_panic() {
            Display::show_status(&ReminderSnapshot::new(
                Interval::default(),
                Duration::from_secs(60),
                true,
            ));
        }
    }

    // ------------------------------------------------------------------------
    // Config Report Tests
    // ------------------------------------------------------------------------

    mod config_report_tests {
        use super::*;

        #[test]
        fn test_effective_interval_defaults() {
            let report = ConfigReport::new(Path::new("/tmp/s.json"), Some(0.0));
            assert_eq!(report.interval_hours, 1.0);
            assert_eq!(report.stored_hours, Some(0.0));

            let report = ConfigReport::new(Path::new("/tmp/s.json"), None);
            assert_eq!(report.interval_hours, 1.0);
        }

        #[test]
        fn test_json_field_names() {
            let report = ConfigReport::new(Path::new("/tmp/s.json"), Some(2.5));
            let value = serde_json::to_value(&report).unwrap();
            assert_eq!(value["path"], "/tmp/s.json");
            assert_eq!(value["storedHours"], 2.5);
            assert_eq!(value["intervalHours"], 2.5);
        }

        #[test]
        fn test_show_config_does_not_panic() {
            let report = ConfigReport::new(Path::new("/tmp/s.json"), Some(2.5));
            Display::show_config(&report);
            Display::show_config_json(&report).unwrap();
        }
    }
}
