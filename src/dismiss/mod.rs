//! Click-outside dismissal of the transient display surface.
//!
//! While the surface is shown, a global pointer monitor is installed. The
//! first left or right press anywhere asks the surface to close and removes
//! the monitor. Presses that land inside the surface are consumed by the
//! surface itself and never reach the global monitor.
//!
//! The monitor callback runs on the input source's thread, so it only
//! forwards a [`MonitorMessage`] to the owning task. Each install gets a new
//! session number; messages from an older install are dropped.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::input::{GlobalInputSource, PointerEvent};
use crate::types::MonitorState;

/// Something that can be asked to close the display surface.
pub trait SurfaceCloser: Send {
    /// Requests that the surface be hidden.
    fn request_close(&self);
}

/// Press observed by a monitor install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorMessage {
    /// Install that observed the press
    pub session: u64,
    pub event: PointerEvent,
}

/// Installs and removes the global pointer monitor.
pub struct DismissController {
    state: MonitorState,
    session: u64,
    source: Box<dyn GlobalInputSource>,
    closer: Box<dyn SurfaceCloser>,
    events_tx: mpsc::UnboundedSender<MonitorMessage>,
}

impl DismissController {
    pub fn new(
        source: Box<dyn GlobalInputSource>,
        closer: Box<dyn SurfaceCloser>,
        events_tx: mpsc::UnboundedSender<MonitorMessage>,
    ) -> Self {
        Self {
            state: MonitorState::Idle,
            session: 0,
            source,
            closer,
            events_tx,
        }
    }

    /// Installs the monitor. Does nothing if one is already installed.
    ///
    /// If the platform refuses the hook the surface simply stays open until
    /// it is closed explicitly.
    pub fn on_surface_shown(&mut self) {
        if self.state == MonitorState::Monitoring {
            return;
        }

        self.session += 1;
        let session = self.session;
        let events_tx = self.events_tx.clone();
        let handler = Box::new(move |event: PointerEvent| {
            let _ = events_tx.send(MonitorMessage { session, event });
        });

        match self.source.start(handler) {
            Ok(()) => {
                self.state = MonitorState::Monitoring;
                tracing::debug!(session, "outside-click monitor installed");
            }
            Err(e) => {
                tracing::warn!("outside-click monitor unavailable: {} ({})", e, e.suggestion());
            }
        }
    }

    /// Removes the monitor. Safe to call repeatedly.
    pub fn on_surface_hidden(&mut self) {
        if self.state == MonitorState::Idle {
            return;
        }
        self.source.stop();
        self.state = MonitorState::Idle;
        tracing::debug!(session = self.session, "outside-click monitor removed");
    }

    /// Handles a press forwarded by the monitor.
    ///
    /// Returns true if the press dismissed the surface.
    pub fn handle_message(&mut self, message: MonitorMessage) -> bool {
        if self.state != MonitorState::Monitoring || message.session != self.session {
            tracing::debug!(session = message.session, "ignoring press from removed monitor");
            return false;
        }

        tracing::debug!(button = %message.event.button, "click outside surface");
        self.on_surface_hidden();
        self.closer.request_close();
        true
    }

    /// Current monitor state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Returns true while a monitor is installed.
    pub fn is_monitoring(&self) -> bool {
        self.state == MonitorState::Monitoring
    }
}

impl Drop for DismissController {
    fn drop(&mut self) {
        self.on_surface_hidden();
    }
}

// ============================================================================
// MockSurfaceCloser
// ============================================================================

/// Counts close requests. Clones share the count.
#[derive(Debug, Default, Clone)]
pub struct MockSurfaceCloser {
    requests: Arc<Mutex<usize>>,
}

impl MockSurfaceCloser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of close requests so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

impl SurfaceCloser for MockSurfaceCloser {
    fn request_close(&self) {
        *self.requests.lock().unwrap() += 1;
    }
}
