//! Integration tests with the real tokio timer driver.
//!
//! These run the coordinator event loop on a live runtime with very short
//! intervals (0.0001 hours = 360 ms) and check that:
//! - reminders fire and re-arm on their own
//! - a replaced reminder never fires
//! - a click outside the open surface closes it
//! - quitting cancels the pending reminder

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use standing_desk_timer::{
    Coordinator, CoordinatorParts, GlobalInputSource, ManualInputSource, MemoryIntervalStore, MockNotificationSink,
    MockSurface, MonitorState, PointerButton, SystemClock, TokioTimerDriver, UiEvent,
};

/// 360 ms.
const SHORT_INTERVAL_HOURS: f64 = 0.0001;

// ============================================================================
// Test Helpers
// ============================================================================

struct LiveApp {
    coordinator: Coordinator,
    sink: MockNotificationSink,
    input: ManualInputSource,
    surface: MockSurface,
}

fn create_live_app(stored_hours: f64) -> LiveApp {
    let sink = MockNotificationSink::new();
    let input = ManualInputSource::new();
    let surface = MockSurface::new();

    let coordinator = Coordinator::new(CoordinatorParts {
        driver: Box::new(TokioTimerDriver::new().unwrap()),
        clock: Arc::new(SystemClock),
        sink: Box::new(sink.clone()),
        input: Box::new(input.clone()),
        surface: Box::new(surface.clone()),
        store: Box::new(MemoryIntervalStore::with_value(stored_hours)),
    });

    LiveApp {
        coordinator,
        sink,
        input,
        surface,
    }
}

/// Runs the event loop for `duration`, then shuts it down.
async fn run_for(coordinator: &mut Coordinator, duration: Duration) {
    timeout(duration + Duration::from_secs(2), coordinator.run_until(sleep(duration)))
        .await
        .expect("event loop should stop after shutdown");
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_reminders_fire_repeatedly() {
    let mut app = create_live_app(SHORT_INTERVAL_HOURS);
    app.coordinator.start(None).unwrap();
    app.sink.clear_recorded();

    run_for(&mut app.coordinator, Duration::from_millis(1000)).await;

    assert!(
        app.sink.persistent_count() >= 2,
        "expected at least two reminders, got {}",
        app.sink.persistent_count()
    );
    assert!(app.coordinator.is_quitting());
    assert!(!app.coordinator.is_armed());
}

#[tokio::test]
async fn test_replaced_reminder_does_not_fire() {
    let mut app = create_live_app(SHORT_INTERVAL_HOURS);
    app.coordinator.start(None).unwrap();
    app.coordinator
        .handle_event(UiEvent::IntervalCommitted(1.0));
    app.sink.clear_recorded();

    run_for(&mut app.coordinator, Duration::from_millis(800)).await;

    assert_eq!(app.sink.persistent_count(), 0);
}

#[tokio::test]
async fn test_outside_click_closes_surface() {
    let mut app = create_live_app(1.0);
    app.coordinator.start(None).unwrap();
    let ui = app.coordinator.ui_sender();
    let input = app.input.clone();

    let script = tokio::spawn(async move {
        ui.send(UiEvent::ShowRequested);
        sleep(Duration::from_millis(100)).await;
        input.press(PointerButton::Left);
        sleep(Duration::from_millis(100)).await;
        ui.send(UiEvent::QuitRequested);
    });

    timeout(
        Duration::from_secs(3),
        app.coordinator.run_until(std::future::pending()),
    )
    .await
    .expect("event loop should stop on quit");
    script.await.unwrap();

    assert_eq!(app.surface.show_count(), 1);
    assert!(!app.surface.shown());
    assert_eq!(app.coordinator.monitor_state(), MonitorState::Idle);
    assert!(!app.input.is_active());
}

#[tokio::test]
async fn test_countdown_observer_on_another_task() {
    let mut app = create_live_app(1.0);
    app.coordinator.start(None).unwrap();
    let countdown = app.coordinator.countdown();

    let observed = tokio::spawn(async move {
        let first = countdown.time_remaining();
        sleep(Duration::from_millis(300)).await;
        let second = countdown.time_remaining();
        (first, second)
    });

    run_for(&mut app.coordinator, Duration::from_millis(500)).await;
    let (first, second) = observed.await.unwrap();

    assert!(first <= Duration::from_secs(3600));
    assert!(second < first);
}
