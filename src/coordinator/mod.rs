//! Application coordinator.
//!
//! Owns the scheduler, the dismiss controller, the display surface and the
//! settings store, and runs the event loop that feeds them:
//! - UI events ([`UiEvent`]) from whatever front-end is attached
//! - reminder firings from the timer driver
//! - pointer presses from the global input monitor
//! - a 1 Hz tick that refreshes the open surface
//!
//! Every message is handled on one task, so the scheduler and the dismiss
//! controller each have a single writer.

pub mod event;
pub mod surface;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::clock::{Clock, TimerDriver};
use crate::dismiss::{DismissController, MonitorMessage};
use crate::input::GlobalInputSource;
use crate::notification::NotificationSink;
use crate::scheduler::{Countdown, ReminderScheduler, SchedulerError, TimerFired};
use crate::store::IntervalStore;
use crate::types::{HideReason, Interval, MonitorState, ReminderSnapshot};

pub use self::event::{UiEvent, UiEventSender};
pub use self::surface::{DisplaySurface, MockSurface, TerminalSurface};

/// How often the open surface is refreshed.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// Collaborators injected into the [`Coordinator`].
pub struct CoordinatorParts {
    pub driver: Box<dyn TimerDriver>,
    pub clock: Arc<dyn Clock>,
    pub sink: Box<dyn NotificationSink>,
    pub input: Box<dyn GlobalInputSource>,
    pub surface: Box<dyn DisplaySurface>,
    pub store: Box<dyn IntervalStore>,
}

/// Binds UI events to the scheduler and the dismiss controller.
pub struct Coordinator {
    scheduler: ReminderScheduler,
    dismiss: DismissController,
    surface: Box<dyn DisplaySurface>,
    store: Box<dyn IntervalStore>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    fired_rx: mpsc::UnboundedReceiver<TimerFired>,
    monitor_rx: mpsc::UnboundedReceiver<MonitorMessage>,
    quitting: bool,
}

impl Coordinator {
    pub fn new(parts: CoordinatorParts) -> Self {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let (monitor_tx, monitor_rx) = mpsc::unbounded_channel();

        let scheduler = ReminderScheduler::new(parts.driver, parts.clock, parts.sink, fired_tx);
        let dismiss = DismissController::new(
            parts.input,
            Box::new(UiEventSender::new(ui_tx.clone())),
            monitor_tx,
        );

        Self {
            scheduler,
            dismiss,
            surface: parts.surface,
            store: parts.store,
            ui_tx,
            ui_rx,
            fired_rx,
            monitor_rx,
            quitting: false,
        }
    }

    /// Arms the first reminder.
    ///
    /// `override_hours` takes precedence over the stored interval and is
    /// saved; otherwise the stored interval is used, defaulting to one hour.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::TimerArm`] if the timer cannot be armed.
    pub fn start(&mut self, override_hours: Option<f64>) -> Result<Instant, SchedulerError> {
        let interval = match override_hours {
            Some(hours) => {
                let interval = Interval::from_slider(hours);
                self.persist(interval);
                interval
            }
            None => Interval::from_stored(self.stored_hours()),
        };

        let next_fire_at = self.scheduler.start(interval.hours())?;
        tracing::info!(interval_hours = interval.hours(), "coordinator started");
        Ok(next_fire_at)
    }

    /// Sender for front-ends.
    pub fn ui_sender(&self) -> UiEventSender {
        UiEventSender::new(self.ui_tx.clone())
    }

    /// Countdown view for front-ends.
    pub fn countdown(&self) -> Countdown {
        self.scheduler.countdown()
    }

    pub fn time_remaining(&self) -> Duration {
        self.scheduler.time_remaining()
    }

    pub fn snapshot(&self) -> ReminderSnapshot {
        self.scheduler.snapshot()
    }

    pub fn interval(&self) -> Interval {
        self.scheduler.interval()
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.dismiss.state()
    }

    pub fn is_surface_shown(&self) -> bool {
        self.surface.is_shown()
    }

    pub fn is_armed(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    // ------------------------------------------------------------------------
    // UI event handlers
    // ------------------------------------------------------------------------

    pub fn on_show_requested(&mut self) {
        if self.surface.is_shown() {
            return;
        }
        let snapshot = self.scheduler.snapshot();
        self.surface.show(&snapshot);
        self.dismiss.on_surface_shown();
    }

    pub fn on_hide_requested(&mut self, reason: HideReason) {
        self.dismiss.on_surface_hidden();
        if self.surface.is_shown() {
            self.surface.close();
            tracing::debug!(reason = %reason, "surface hidden");
        }
    }

    pub fn on_toggle_requested(&mut self) {
        if self.surface.is_shown() {
            self.on_hide_requested(HideReason::Explicit);
        } else {
            self.on_show_requested();
        }
    }

    /// Applies a raw slider value, truncated to tenths, and saves it.
    pub fn on_interval_committed(&mut self, raw: f64) {
        let interval = Interval::from_slider(raw);
        match self.scheduler.set_interval(interval) {
            Ok(_) => {
                self.persist(interval);
                self.refresh_surface();
            }
            Err(e) => self.report(&e),
        }
    }

    /// Restarts the countdown. The stored interval is not touched.
    pub fn on_reset_requested(&mut self) {
        match self.scheduler.reset() {
            Ok(_) => self.refresh_surface(),
            Err(e) => self.report(&e),
        }
    }

    /// Cancels the pending reminder and the monitor, then stops the loop.
    pub fn on_quit_requested(&mut self) {
        self.scheduler.cancel();
        self.on_hide_requested(HideReason::Quit);
        self.quitting = true;
        tracing::info!("quit requested");
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        tracing::debug!(event = %event, "ui event");
        match event {
            UiEvent::ShowRequested => self.on_show_requested(),
            UiEvent::HideRequested(reason) => self.on_hide_requested(reason),
            UiEvent::ToggleRequested => self.on_toggle_requested(),
            UiEvent::IntervalCommitted(raw) => self.on_interval_committed(raw),
            UiEvent::ResetRequested => self.on_reset_requested(),
            UiEvent::QuitRequested => self.on_quit_requested(),
        }
    }

    fn handle_fired(&mut self, fired: TimerFired) {
        match self.scheduler.handle_fired(fired) {
            Ok(true) => self.refresh_surface(),
            Ok(false) => {}
            Err(e) => {
                self.report(&e);
                self.refresh_surface();
            }
        }
    }

    fn handle_monitor(&mut self, message: MonitorMessage) {
        self.dismiss.handle_message(message);
    }

    // ------------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------------

    /// Handles every queued message without waiting.
    ///
    /// Returns the number of messages handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            if let Ok(message) = self.monitor_rx.try_recv() {
                self.handle_monitor(message);
            } else if let Ok(fired) = self.fired_rx.try_recv() {
                self.handle_fired(fired);
            } else if let Ok(event) = self.ui_rx.try_recv() {
                self.handle_event(event);
            } else {
                return handled;
            }
            handled += 1;
        }
    }

    /// Runs until a quit request or until `shutdown` completes.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(REFRESH_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !self.quitting {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received");
                    self.on_quit_requested();
                }
                Some(message) = self.monitor_rx.recv() => self.handle_monitor(message),
                Some(fired) = self.fired_rx.recv() => self.handle_fired(fired),
                Some(event) = self.ui_rx.recv() => self.handle_event(event),
                _ = ticker.tick() => self.refresh_surface(),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn stored_hours(&self) -> Option<f64> {
        match self.store.get_stored_interval() {
            Ok(hours) => hours,
            Err(e) => {
                tracing::warn!("failed to read stored interval: {} ({})", e, e.suggestion());
                None
            }
        }
    }

    fn persist(&mut self, interval: Interval) {
        if let Err(e) = self.store.set_stored_interval(interval) {
            tracing::warn!("failed to save interval: {} ({})", e, e.suggestion());
        }
    }

    fn refresh_surface(&mut self) {
        if self.surface.is_shown() {
            let snapshot = self.scheduler.snapshot();
            self.surface.refresh(&snapshot);
        }
    }

    fn report(&mut self, error: &SchedulerError) {
        tracing::warn!("{} ({})", error, error.suggestion());
        self.surface.report_error(&error.to_string());
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.scheduler.cancel();
        self.dismiss.on_surface_hidden();
    }
}

// ============================================================================
// Tests
// ============================================================================
