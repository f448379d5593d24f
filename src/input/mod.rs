//! Global pointer input monitoring.
//!
//! A [`GlobalInputSource`] reports pointer presses anywhere on screen,
//! independent of which window has focus, to a single registered handler.
//!
//! - `RdevInputSource` (feature `global-input`): the OS-level hook
//! - [`ManualInputSource`]: presses are injected by the caller; used by the
//!   console front-end and by tests

pub mod error;
#[cfg(feature = "global-input")]
mod hook;

use std::fmt;
use std::sync::{Arc, Mutex};

pub use self::error::InputError;
#[cfg(feature = "global-input")]
pub use self::hook::RdevInputSource;

/// Which pointer button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
}

impl fmt::Display for PointerButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerButton::Left => write!(f, "left"),
            PointerButton::Right => write!(f, "right"),
        }
    }
}

/// A systemwide pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: PointerButton,
}

/// Called once per observed pointer press while the source is active.
pub type InputHandler = Box<dyn Fn(PointerEvent) + Send + Sync + 'static>;

/// Capability to observe pointer presses outside the application.
pub trait GlobalInputSource: Send {
    /// Starts delivering presses to `handler`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the platform hook cannot be installed.
    fn start(&mut self, handler: InputHandler) -> Result<(), InputError>;

    /// Stops delivering presses. Safe to call when not started.
    fn stop(&mut self);

    /// Returns true while a handler is registered.
    fn is_active(&self) -> bool;
}

// ============================================================================
// ManualInputSource
// ============================================================================

#[derive(Default)]
struct ManualState {
    handler: Option<Arc<dyn Fn(PointerEvent) + Send + Sync>>,
    start_calls: usize,
    stop_calls: usize,
    should_fail: bool,
}

/// Input source whose presses are injected with [`ManualInputSource::press`].
///
/// Clones share the same registration.
#[derive(Clone, Default)]
pub struct ManualInputSource {
    state: Arc<Mutex<ManualState>>,
}

impl ManualInputSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `start` calls fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.should_fail = should_fail;
        }
    }

    /// Delivers a press to the registered handler.
    ///
    /// Returns false if no handler is registered.
    pub fn press(&self, button: PointerButton) -> bool {
        let handler = match self.state.lock() {
            Ok(state) => state.handler.clone(),
            Err(_) => None,
        };

        match handler {
            Some(handler) => {
                handler(PointerEvent { button });
                true
            }
            None => false,
        }
    }

    /// Number of successful `start` calls.
    #[must_use]
    pub fn start_count(&self) -> usize {
        self.state.lock().map(|s| s.start_calls).unwrap_or(0)
    }

    /// Number of `stop` calls.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.state.lock().map(|s| s.stop_calls).unwrap_or(0)
    }
}

impl GlobalInputSource for ManualInputSource {
    fn start(&mut self, handler: InputHandler) -> Result<(), InputError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| InputError::Unavailable("state lock poisoned".to_string()))?;
        if state.should_fail {
            return Err(InputError::Unavailable("Mock failure".to_string()));
        }
        state.handler = Some(Arc::from(handler));
        state.start_calls += 1;
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.handler = None;
            state.stop_calls += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.state
            .lock()
            .map(|s| s.handler.is_some())
            .unwrap_or(false)
    }
}

impl fmt::Debug for ManualInputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualInputSource")
            .field("active", &self.is_active())
            .field("start_count", &self.start_count())
            .finish()
    }
}
