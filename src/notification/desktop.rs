//! Desktop notification sink backed by `notify-rust`.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use notify_rust::{Notification, Timeout};

use super::{NotificationError, NotificationSink, TRANSIENT_DISPLAY};

/// Server ids of notices this sink has put on screen.
#[derive(Debug, Default)]
struct Delivered {
    /// Id of the last notice shown
    last_id: Option<u32>,
    /// Id the next notice takes over after `clear_all`
    replaces: Option<u32>,
}

/// Presents notices through the platform notification service.
///
/// Delivery happens on a short-lived thread so callers on the event loop
/// never wait for the notification daemon.
///
/// On freedesktop servers `clear_all` hands the id of the last notice to the
/// next one, which then replaces it in place. Other platforms cannot remove a
/// delivered notice; transient ones still expire through their timeout.
#[derive(Debug, Clone)]
pub struct DesktopNotificationSink {
    app_name: String,
    transient_timeout: Duration,
    delivered: Arc<Mutex<Delivered>>,
}

impl DesktopNotificationSink {
    /// Creates a sink that labels notifications with `app_name`.
    #[must_use]
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            transient_timeout: TRANSIENT_DISPLAY,
            delivered: Arc::new(Mutex::new(Delivered::default())),
        }
    }

    fn build(
        &self,
        title: &str,
        body: &str,
        persistent: bool,
        replaces: Option<u32>,
    ) -> Notification {
        let mut notification = Notification::new();
        notification.appname(&self.app_name).summary(title).body(body);

        if persistent {
            notification.timeout(Timeout::Never);
        } else {
            let millis = u32::try_from(self.transient_timeout.as_millis()).unwrap_or(u32::MAX);
            notification.timeout(Timeout::Milliseconds(millis));
        }
        assign_id(&mut notification, replaces);
        notification
    }

    /// Takes the id queued by `clear_all`, if any.
    fn take_replaced(&self) -> Option<u32> {
        self.delivered.lock().ok().and_then(|mut d| d.replaces.take())
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn assign_id(notification: &mut Notification, replaces: Option<u32>) {
    if let Some(id) = replaces {
        notification.id(id);
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn assign_id(_notification: &mut Notification, _replaces: Option<u32>) {}

#[cfg(all(unix, not(target_os = "macos")))]
fn record_shown(delivered: &Mutex<Delivered>, handle: &notify_rust::NotificationHandle) {
    if let Ok(mut d) = delivered.lock() {
        d.last_id = Some(handle.id());
    }
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn record_shown<H>(_delivered: &Mutex<Delivered>, _handle: &H) {}

impl NotificationSink for DesktopNotificationSink {
    fn display(&self, title: &str, body: &str, persistent: bool) -> Result<(), NotificationError> {
        let notification = self.build(title, body, persistent, self.take_replaced());
        let delivered = Arc::clone(&self.delivered);

        thread::Builder::new()
            .name("notification".to_string())
            .spawn(move || match notification.show() {
                Ok(handle) => record_shown(&delivered, &handle),
                Err(e) => tracing::warn!("desktop notification failed: {}", e),
            })
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn clear_all(&self) {
        if let Ok(mut d) = self.delivered.lock() {
            d.replaces = d.last_id.take();
            tracing::debug!(replaces = ?d.replaces, "next notice replaces the last one");
        }
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn clear_all(&self) {
        tracing::debug!("delivered notices cannot be removed on this platform");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> DesktopNotificationSink {
        DesktopNotificationSink::new("Standing Desk Timer")
    }

    #[test]
    fn test_build_transient_expires() {
        let notification = sink().build("Interval Updated", "body", false, None);
        assert_eq!(notification.summary, "Interval Updated");
        assert_eq!(notification.appname, "Standing Desk Timer");
        assert_eq!(notification.timeout, Timeout::Milliseconds(5000));
    }

    #[test]
    fn test_build_persistent_never_expires() {
        let notification = sink().build("Time to Switch!", "body", true, None);
        assert_eq!(notification.timeout, Timeout::Never);
    }

    #[test]
    fn test_nothing_to_replace_initially() {
        let sink = sink();
        sink.clear_all();
        assert_eq!(sink.take_replaced(), None);
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    mod replace_tests {
        use super::*;

        #[test]
        fn test_build_assigns_replaced_id() {
            let notification = sink().build("Time to Switch!", "body", true, Some(7));
            assert_eq!(notification.id, Some(7));
        }

        #[test]
        fn test_build_without_replaced_id() {
            let notification = sink().build("Time to Switch!", "body", true, None);
            assert_eq!(notification.id, None);
        }

        #[test]
        fn test_clear_all_hands_last_id_to_next_notice() {
            let sink = sink();
            sink.delivered.lock().unwrap().last_id = Some(3);

            sink.clear_all();

            assert_eq!(sink.take_replaced(), Some(3));
            assert_eq!(sink.take_replaced(), None);
            assert_eq!(sink.delivered.lock().unwrap().last_id, None);
        }

        #[test]
        fn test_clones_share_delivered_ids() {
            let sink = sink();
            let clone = sink.clone();
            sink.delivered.lock().unwrap().last_id = Some(11);

            clone.clear_all();

            assert_eq!(
                sink.build("t", "b", false, sink.take_replaced()).id,
                Some(11)
            );
        }
    }
}
