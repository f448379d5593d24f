//! UI-originated events.
//!
//! Whatever front-end drives the application (the console, or a future
//! panel) talks to the coordinator only through [`UiEvent`]s sent over a
//! channel. The coordinator never holds a reference back into the UI.

use std::fmt;

use tokio::sync::mpsc;

use crate::dismiss::SurfaceCloser;
use crate::types::HideReason;

// ============================================================================
// UiEvent
// ============================================================================

/// Requests the UI can make of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// Show the transient display surface
    ShowRequested,
    /// Hide the transient display surface
    HideRequested(HideReason),
    /// Show the surface if hidden, hide it if shown
    ToggleRequested,
    /// The interval slider was released at a raw value
    IntervalCommitted(f64),
    /// Restart the countdown
    ResetRequested,
    /// Cancel everything and exit
    QuitRequested,
}

impl fmt::Display for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiEvent::ShowRequested => write!(f, "show"),
            UiEvent::HideRequested(reason) => write!(f, "hide ({})", reason),
            UiEvent::ToggleRequested => write!(f, "toggle"),
            UiEvent::IntervalCommitted(raw) => write!(f, "interval {}", raw),
            UiEvent::ResetRequested => write!(f, "reset"),
            UiEvent::QuitRequested => write!(f, "quit"),
        }
    }
}

// ============================================================================
// UiEventSender
// ============================================================================

/// Cloneable handle for sending [`UiEvent`]s to a running coordinator.
#[derive(Debug, Clone)]
pub struct UiEventSender {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl UiEventSender {
    pub fn new(tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self { tx }
    }

    /// Sends an event. Returns false once the coordinator has shut down.
    pub fn send(&self, event: UiEvent) -> bool {
        if self.tx.send(event).is_err() {
            tracing::debug!(event = %event, "coordinator gone, dropping event");
            return false;
        }
        true
    }
}

impl SurfaceCloser for UiEventSender {
    fn request_close(&self) {
        self.send(UiEvent::HideRequested(HideReason::OutsideClick));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(UiEvent::ShowRequested.to_string(), "show");
        assert_eq!(
            UiEvent::HideRequested(HideReason::OutsideClick).to_string(),
            "hide (outside_click)"
        );
        assert_eq!(UiEvent::ToggleRequested.to_string(), "toggle");
        assert_eq!(UiEvent::IntervalCommitted(1.37).to_string(), "interval 1.37");
        assert_eq!(UiEvent::ResetRequested.to_string(), "reset");
        assert_eq!(UiEvent::QuitRequested.to_string(), "quit");
    }

    #[test]
    fn test_sender_delivers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = UiEventSender::new(tx);

        assert!(sender.send(UiEvent::ResetRequested));
        assert_eq!(rx.try_recv().unwrap(), UiEvent::ResetRequested);
    }

    #[test]
    fn test_sender_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = UiEventSender::new(tx);
        drop(rx);

        assert!(!sender.send(UiEvent::ShowRequested));
    }

    #[test]
    fn test_close_request_is_outside_click_hide() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = UiEventSender::new(tx);

        sender.request_close();

        assert_eq!(
            rx.try_recv().unwrap(),
            UiEvent::HideRequested(HideReason::OutsideClick)
        );
    }
}
