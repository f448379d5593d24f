//! Reminder scheduler.
//!
//! Owns the interval and the single armed reminder:
//! - `start` / `set_interval` / `reset` replace the armed reminder
//! - each firing emits a persistent reminder and re-arms at `now + interval`
//! - `time_remaining` and [`Countdown`] expose the live countdown
//!
//! Timer callbacks never touch the scheduler. They send a [`TimerFired`]
//! carrying the reminder's token; the owner passes it to
//! [`ReminderScheduler::handle_fired`], which ignores tokens of reminders
//! that were replaced or cancelled in the meantime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::clock::{Clock, ClockError, TimerDriver, TimerHandle, TimerToken};
use crate::notification::content::{
    format_alert_time, interval_updated_notice, reminder_notice, wall_time_after, Notice,
};
use crate::notification::NotificationSink;
use crate::types::{Interval, ReminderSnapshot};

// ============================================================================
// SchedulerError
// ============================================================================

/// Errors surfaced by the scheduler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// The timer primitive refused the new reminder.
    #[error("could not arm reminder: {0}")]
    TimerArm(#[from] ClockError),
}

impl SchedulerError {
    /// Returns true if the scheduler keeps working after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::TimerArm(e) => e.is_recoverable(),
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::TimerArm(e) => e.suggestion(),
        }
    }
}

// ============================================================================
// TimerFired
// ============================================================================

/// Message sent by an armed reminder when its deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    /// Token of the reminder that fired
    pub token: TimerToken,
}

// ============================================================================
// Countdown
// ============================================================================

/// Published scheduler state for countdown observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownState {
    /// Current interval
    pub interval: Interval,
    /// Deadline of the armed reminder, if any
    pub next_fire_at: Option<Instant>,
}

/// Read-only countdown view that can be polled from any task.
#[derive(Debug, Clone)]
pub struct Countdown {
    state: watch::Receiver<CountdownState>,
    clock: Arc<dyn Clock>,
}

impl Countdown {
    /// Time until the next reminder, zero when nothing is armed.
    pub fn time_remaining(&self) -> Duration {
        let next_fire_at = self.state.borrow().next_fire_at;
        remaining_until(next_fire_at, self.clock.now())
    }

    /// Current interval.
    pub fn interval(&self) -> Interval {
        self.state.borrow().interval
    }

    /// Returns true while a reminder is armed.
    pub fn is_armed(&self) -> bool {
        self.state.borrow().next_fire_at.is_some()
    }

    /// Point-in-time snapshot.
    pub fn snapshot(&self) -> ReminderSnapshot {
        ReminderSnapshot::new(self.interval(), self.time_remaining(), self.is_armed())
    }
}

fn remaining_until(next_fire_at: Option<Instant>, now: Instant) -> Duration {
    next_fire_at
        .map(|at| at.saturating_duration_since(now))
        .unwrap_or(Duration::ZERO)
}

// ============================================================================
// ReminderScheduler
// ============================================================================

/// The armed timer state.
#[derive(Debug)]
struct ScheduledReminder {
    token: TimerToken,
    interval: Interval,
    next_fire_at: Instant,
    handle: TimerHandle,
}

/// Schedules the recurring reminder.
pub struct ReminderScheduler {
    /// Current interval
    interval: Interval,
    /// The single armed reminder
    reminder: Option<ScheduledReminder>,
    /// Last issued token
    last_token: u64,
    driver: Box<dyn TimerDriver>,
    clock: Arc<dyn Clock>,
    sink: Box<dyn NotificationSink>,
    /// Firing messages go here
    fired_tx: mpsc::UnboundedSender<TimerFired>,
    countdown_tx: watch::Sender<CountdownState>,
}

impl ReminderScheduler {
    /// Creates an idle scheduler. Nothing is armed until `start`.
    pub fn new(
        driver: Box<dyn TimerDriver>,
        clock: Arc<dyn Clock>,
        sink: Box<dyn NotificationSink>,
        fired_tx: mpsc::UnboundedSender<TimerFired>,
    ) -> Self {
        let interval = Interval::default();
        let (countdown_tx, _) = watch::channel(CountdownState {
            interval,
            next_fire_at: None,
        });

        Self {
            interval,
            reminder: None,
            last_token: 0,
            driver,
            clock,
            sink,
            fired_tx,
            countdown_tx,
        }
    }

    /// Arms the first reminder.
    ///
    /// Non-positive or non-finite hours fall back to the default interval.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::TimerArm`] if the timer cannot be armed.
    pub fn start(&mut self, initial_hours: f64) -> Result<Instant, SchedulerError> {
        self.set_interval(Interval::or_default(initial_hours))
    }

    /// Replaces the armed reminder with one firing at `now + interval`.
    ///
    /// Emits a transient "interval updated" notice on success. Returns the
    /// new deadline.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::TimerArm`] if the timer cannot be armed.
    /// The previous reminder and interval are left untouched.
    pub fn set_interval(&mut self, interval: Interval) -> Result<Instant, SchedulerError> {
        let next_fire_at = self.deadline_after(interval)?;
        self.install(interval, next_fire_at)?;

        tracing::info!(interval_hours = interval.hours(), "reminder interval set");
        let next_alert = self.alert_time_text(next_fire_at);
        self.notify(&interval_updated_notice(interval, &next_alert));

        Ok(next_fire_at)
    }

    /// Restarts the countdown without changing the interval.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::TimerArm`] if the timer cannot be armed.
    pub fn reset(&mut self) -> Result<Instant, SchedulerError> {
        self.set_interval(self.interval)
    }

    /// Handles a firing delivered by the timer driver.
    ///
    /// Returns `Ok(false)` for firings of replaced or cancelled reminders.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::TimerArm`] if the next reminder cannot be
    /// armed. The reminder notice has been shown by then, and the scheduler
    /// is left disarmed until the next `reset` or `set_interval`.
    pub fn handle_fired(&mut self, fired: TimerFired) -> Result<bool, SchedulerError> {
        let current = self.reminder.as_ref().map(|r| r.token);
        if current != Some(fired.token) {
            tracing::debug!(token = %fired.token, "ignoring stale reminder firing");
            return Ok(false);
        }

        tracing::info!(token = %fired.token, "reminder fired");
        let interval = self.interval;
        let next_fire_at = self.deadline_after(interval);

        let next_alert = match next_fire_at {
            Ok(at) => self.alert_time_text(at),
            Err(_) => format_alert_time(None),
        };
        self.notify(&reminder_notice(&next_alert));

        if let Err(e) = next_fire_at.and_then(|at| self.install(interval, at)) {
            // The fired timer is spent, so nothing is pending any more.
            self.cancel();
            return Err(e);
        }
        Ok(true)
    }

    /// Cancels the armed reminder, if any.
    pub fn cancel(&mut self) {
        if let Some(mut reminder) = self.reminder.take() {
            reminder.handle.cancel();
            tracing::info!(token = %reminder.token, "reminder cancelled");
        }
        self.countdown_tx.send_replace(CountdownState {
            interval: self.interval,
            next_fire_at: None,
        });
    }

    /// Time until the next reminder, zero when nothing is armed.
    pub fn time_remaining(&self) -> Duration {
        remaining_until(self.next_fire_at(), self.clock.now())
    }

    /// Current interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Deadline of the armed reminder.
    pub fn next_fire_at(&self) -> Option<Instant> {
        self.reminder.as_ref().map(|r| r.next_fire_at)
    }

    /// Token of the armed reminder.
    pub fn current_token(&self) -> Option<TimerToken> {
        self.reminder.as_ref().map(|r| r.token)
    }

    /// Interval the armed reminder was created with.
    pub fn armed_interval(&self) -> Option<Interval> {
        self.reminder.as_ref().map(|r| r.interval)
    }

    /// Returns true while a reminder is armed.
    pub fn is_armed(&self) -> bool {
        self.reminder.is_some()
    }

    /// Countdown view for observers on other tasks.
    pub fn countdown(&self) -> Countdown {
        Countdown {
            state: self.countdown_tx.subscribe(),
            clock: Arc::clone(&self.clock),
        }
    }

    /// Point-in-time snapshot.
    pub fn snapshot(&self) -> ReminderSnapshot {
        ReminderSnapshot::new(self.interval, self.time_remaining(), self.is_armed())
    }

    fn deadline_after(&self, interval: Interval) -> Result<Instant, SchedulerError> {
        self.clock
            .now()
            .checked_add(interval.as_duration())
            .ok_or(SchedulerError::TimerArm(ClockError::DeadlineOutOfRange))
    }

    /// Arms the replacement first so a failure leaves the current one alone.
    fn install(&mut self, interval: Interval, next_fire_at: Instant) -> Result<(), SchedulerError> {
        self.last_token += 1;
        let token = TimerToken::new(self.last_token);

        let fired_tx = self.fired_tx.clone();
        let handle = self.driver.arm(
            next_fire_at,
            Box::new(move || {
                if fired_tx.send(TimerFired { token }).is_err() {
                    tracing::debug!(token = %token, "scheduler gone, dropping firing");
                }
            }),
        )?;

        if let Some(mut previous) = self.reminder.take() {
            previous.handle.cancel();
            tracing::debug!(token = %previous.token, "previous reminder cancelled");
        }

        self.reminder = Some(ScheduledReminder {
            token,
            interval,
            next_fire_at,
            handle,
        });
        self.interval = interval;
        self.countdown_tx.send_replace(CountdownState {
            interval,
            next_fire_at: Some(next_fire_at),
        });

        tracing::debug!(token = %token, "reminder armed");
        Ok(())
    }

    fn alert_time_text(&self, next_fire_at: Instant) -> String {
        let remaining = next_fire_at.saturating_duration_since(self.clock.now());
        format_alert_time(wall_time_after(remaining))
    }

    /// Replaces whatever is on screen with `notice`.
    fn notify(&self, notice: &Notice) {
        self.sink.clear_all();
        if let Err(e) = self.sink.show(notice) {
            tracing::warn!("notification failed: {} ({})", e, e.suggestion());
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Tests
// ============================================================================
