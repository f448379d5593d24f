//! Standing Desk Timer Library
//!
//! This library provides the core functionality for the standing desk timer.
//! It includes:
//! - Reminder scheduler with a repeating, resettable interval
//! - Click-outside dismissal of the transient display surface
//! - Coordinator event loop binding UI events to both
//! - Clock, timer, notification, input and settings abstractions
//! - CLI command parsing, console front-end and display utilities

pub mod cli;
pub mod clock;
pub mod coordinator;
pub mod dismiss;
pub mod input;
pub mod notification;
pub mod scheduler;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    truncate_to_tenths, HideReason, Interval, IntervalError, MonitorState, ReminderSnapshot,
    DEFAULT_INTERVAL_HOURS,
};

pub use clock::{
    Clock, ClockError, ManualClock, MockTimerDriver, SystemClock, TimerDriver, TimerHandle,
    TimerToken, TokioTimerDriver,
};

pub use notification::{
    DesktopNotificationSink, LogNotificationSink, MockNotificationSink, Notice, NotificationError,
    NotificationSink, REMINDER_TITLE,
};

pub use input::{GlobalInputSource, InputError, ManualInputSource, PointerButton, PointerEvent};
#[cfg(feature = "global-input")]
pub use input::RdevInputSource;

pub use store::{IntervalStore, JsonIntervalStore, MemoryIntervalStore, StoreError};

pub use scheduler::{Countdown, ReminderScheduler, SchedulerError, TimerFired};

pub use dismiss::{DismissController, MockSurfaceCloser, MonitorMessage, SurfaceCloser};

pub use coordinator::{
    Coordinator, CoordinatorParts, DisplaySurface, MockSurface, TerminalSurface, UiEvent,
    UiEventSender,
};
