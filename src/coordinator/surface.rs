//! The transient display surface.
//!
//! The surface shows the countdown and the interval controls while it is
//! open. It only renders; every decision about when to open or close it is
//! made by the coordinator.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::types::ReminderSnapshot;

/// A dismissible panel showing the countdown.
pub trait DisplaySurface: Send {
    /// Opens the surface.
    fn show(&mut self, snapshot: &ReminderSnapshot);

    /// Closes the surface. Safe to call when already closed.
    fn close(&mut self);

    /// Returns true while the surface is open.
    fn is_shown(&self) -> bool;

    /// Updates the countdown while open.
    fn refresh(&mut self, _snapshot: &ReminderSnapshot) {}

    /// Shows a recoverable error to the user.
    fn report_error(&mut self, _message: &str) {}
}

// ============================================================================
// TerminalSurface
// ============================================================================

/// Renders the panel on stdout.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    shown: bool,
}

impl TerminalSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write_countdown(snapshot: &ReminderSnapshot) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "\r{}   ", snapshot.status_line())?;
        stdout.flush()
    }
}

/// Lines of the terminal panel.
fn panel_lines(snapshot: &ReminderSnapshot) -> Vec<String> {
    vec![
        "┌─ Standing Desk Timer ─────────────".to_string(),
        format!("│ Time remaining: {}", snapshot.remaining_hms()),
        format!("│ Interval: {}", snapshot.interval().label()),
        "│ [interval <hours>]  [reset]  [quit]".to_string(),
        "└───────────────────────────────────".to_string(),
    ]
}

impl DisplaySurface for TerminalSurface {
    fn show(&mut self, snapshot: &ReminderSnapshot) {
        self.shown = true;
        println!();
        for line in panel_lines(snapshot) {
            println!("{}", line);
        }
        if let Err(e) = Self::write_countdown(snapshot) {
            tracing::debug!("failed to write countdown: {}", e);
        }
    }

    fn close(&mut self) {
        if self.shown {
            self.shown = false;
            println!();
        }
    }

    fn is_shown(&self) -> bool {
        self.shown
    }

    fn refresh(&mut self, snapshot: &ReminderSnapshot) {
        if !self.shown {
            return;
        }
        if let Err(e) = Self::write_countdown(snapshot) {
            tracing::debug!("failed to write countdown: {}", e);
        }
    }

    fn report_error(&mut self, message: &str) {
        println!();
        eprintln!("Error: {}", message);
    }
}

// ============================================================================
// MockSurface
// ============================================================================

#[derive(Debug, Default)]
struct MockSurfaceState {
    shown: bool,
    show_count: usize,
    close_count: usize,
    refresh_count: usize,
    last_snapshot: Option<ReminderSnapshot>,
    errors: Vec<String>,
}

/// Records surface calls for tests. Clones share the record.
#[derive(Debug, Default, Clone)]
pub struct MockSurface {
    state: Arc<Mutex<MockSurfaceState>>,
}

impl MockSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn show_count(&self) -> usize {
        self.state.lock().unwrap().show_count
    }

    #[must_use]
    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().close_count
    }

    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.state.lock().unwrap().refresh_count
    }

    /// Snapshot passed to the latest `show` or `refresh`.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<ReminderSnapshot> {
        self.state.lock().unwrap().last_snapshot.clone()
    }

    /// Errors reported so far.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.state.lock().unwrap().errors.clone()
    }

    /// Open state, readable from a clone.
    #[must_use]
    pub fn shown(&self) -> bool {
        self.state.lock().unwrap().shown
    }
}

impl DisplaySurface for MockSurface {
    fn show(&mut self, snapshot: &ReminderSnapshot) {
        let mut state = self.state.lock().unwrap();
        state.shown = true;
        state.show_count += 1;
        state.last_snapshot = Some(snapshot.clone());
    }

    fn close(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.shown = false;
        state.close_count += 1;
    }

    fn is_shown(&self) -> bool {
        self.shown()
    }

    fn refresh(&mut self, snapshot: &ReminderSnapshot) {
        let mut state = self.state.lock().unwrap();
        state.refresh_count += 1;
        state.last_snapshot = Some(snapshot.clone());
    }

    fn report_error(&mut self, message: &str) {
        self.state.lock().unwrap().errors.push(message.to_string());
    }
}
