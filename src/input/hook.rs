//! Systemwide pointer hook backed by `rdev`.

use std::sync::{Arc, Mutex};
use std::thread;

use rdev::{listen, Button, EventType};

use super::{GlobalInputSource, InputError, InputHandler, PointerButton, PointerEvent};

type SharedHandler = Arc<Mutex<Option<Arc<dyn Fn(PointerEvent) + Send + Sync>>>>;

/// Observes pointer presses anywhere on screen.
///
/// `rdev::listen` cannot be stopped once running, so the listener thread is
/// spawned on the first `start` and lives for the rest of the process.
/// `stop` detaches the handler; presses observed while detached are dropped.
pub struct RdevInputSource {
    handler: SharedHandler,
    listener_started: bool,
}

impl RdevInputSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handler: Arc::new(Mutex::new(None)),
            listener_started: false,
        }
    }

    fn spawn_listener(&mut self) -> Result<(), InputError> {
        let handler = Arc::clone(&self.handler);

        thread::Builder::new()
            .name("global-input".to_string())
            .spawn(move || {
                let result = listen(move |event| {
                    let button = match event.event_type {
                        EventType::ButtonPress(Button::Left) => PointerButton::Left,
                        EventType::ButtonPress(Button::Right) => PointerButton::Right,
                        _ => return,
                    };

                    let current = handler.lock().ok().and_then(|guard| guard.clone());
                    if let Some(current) = current {
                        current(PointerEvent { button });
                    }
                });

                if let Err(e) = result {
                    tracing::error!("global input listener stopped: {:?}", e);
                }
            })
            .map_err(|e| InputError::StartFailed(e.to_string()))?;

        self.listener_started = true;
        Ok(())
    }
}

impl Default for RdevInputSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalInputSource for RdevInputSource {
    fn start(&mut self, handler: InputHandler) -> Result<(), InputError> {
        if !self.listener_started {
            self.spawn_listener()?;
        }

        let mut slot = self
            .handler
            .lock()
            .map_err(|_| InputError::Unavailable("handler lock poisoned".to_string()))?;
        *slot = Some(Arc::from(handler));
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut slot) = self.handler.lock() {
            *slot = None;
        }
    }

    fn is_active(&self) -> bool {
        self.handler
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}
