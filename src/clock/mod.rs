//! Clock and one-shot timer primitives.
//!
//! The scheduler never sleeps itself. It asks a [`TimerDriver`] to run a
//! callback at a deadline and keeps the returned [`TimerHandle`]; dropping
//! or cancelling the handle guarantees the callback is not invoked if it
//! has not started yet.
//!
//! - [`SystemClock`] / [`TokioTimerDriver`]: production implementations
//! - [`ManualClock`] / [`MockTimerDriver`]: deterministic doubles for tests

pub mod error;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

pub use error::ClockError;

// ============================================================================
// Clock
// ============================================================================

/// Source of the current instant.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Monotonic system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap();
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + *self.offset.lock().unwrap()
    }
}

// ============================================================================
// TimerToken
// ============================================================================

/// Identifies one armed reminder.
///
/// Firings carry the token they were armed with so the owner can discard
/// firings of timers it has already replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Creates a token from a raw sequence number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence number.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// TimerHandle
// ============================================================================

/// Callback invoked once when a timer reaches its deadline.
pub type FireCallback = Box<dyn FnOnce() + Send + 'static>;

/// Cancellation handle for an armed timer.
///
/// Cancelling is synchronous: once `cancel` returns, a callback that has
/// not started will never run. Dropping the handle cancels the timer.
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    abort: Option<AbortHandle>,
}

impl TimerHandle {
    /// Creates a handle around a shared cancellation flag.
    pub fn new(cancelled: Arc<AtomicBool>) -> Self {
        Self {
            cancelled,
            abort: None,
        }
    }

    /// Also aborts the given task on cancellation.
    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = Some(abort);
        self
    }

    /// Cancels the timer. Safe to call more than once.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
    }

    /// Returns true once the timer has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// ============================================================================
// TimerDriver
// ============================================================================

/// Arms one-shot timers.
pub trait TimerDriver: Send + Sync {
    /// Schedules `on_fire` to run once at `deadline`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] if the timer cannot be armed. Nothing is
    /// scheduled in that case.
    fn arm(&self, deadline: Instant, on_fire: FireCallback) -> Result<TimerHandle, ClockError>;
}

/// Timer driver backed by `tokio::time::sleep_until`.
#[derive(Debug, Clone)]
pub struct TokioTimerDriver {
    handle: Handle,
}

impl TokioTimerDriver {
    /// Creates a driver bound to the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::NoRuntime`] when called outside a runtime.
    pub fn new() -> Result<Self, ClockError> {
        Handle::try_current()
            .map(Self::with_handle)
            .map_err(|e| ClockError::NoRuntime(e.to_string()))
    }

    /// Creates a driver that spawns onto the given runtime.
    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl TimerDriver for TokioTimerDriver {
    fn arm(&self, deadline: Instant, on_fire: FireCallback) -> Result<TimerHandle, ClockError> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = self.handle.spawn(async move {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            if !flag.load(Ordering::SeqCst) {
                on_fire();
            }
        });

        Ok(TimerHandle::new(cancelled).with_abort(task.abort_handle()))
    }
}

// ============================================================================
// MockTimerDriver
// ============================================================================

struct ArmedTimer {
    deadline: Instant,
    callback: Option<FireCallback>,
    cancelled: Arc<AtomicBool>,
}

impl ArmedTimer {
    fn is_pending(&self) -> bool {
        self.callback.is_some() && !self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct MockTimerState {
    timers: Vec<ArmedTimer>,
    should_fail: bool,
}

/// Timer driver that records armed timers and fires them on demand.
///
/// Clones share the same timer list, so a test can keep one clone while
/// the scheduler owns another.
#[derive(Clone, Default)]
pub struct MockTimerDriver {
    state: Arc<Mutex<MockTimerState>>,
}

impl MockTimerDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `arm` calls fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.state.lock().unwrap().should_fail = should_fail;
    }

    /// Number of successful `arm` calls.
    #[must_use]
    pub fn arm_count(&self) -> usize {
        self.state.lock().unwrap().timers.len()
    }

    /// Number of timers that are neither cancelled nor fired.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .timers
            .iter()
            .filter(|t| t.is_pending())
            .count()
    }

    /// Deadlines of the pending timers, in arming order.
    #[must_use]
    pub fn pending_deadlines(&self) -> Vec<Instant> {
        self.state
            .lock()
            .unwrap()
            .timers
            .iter()
            .filter(|t| t.is_pending())
            .map(|t| t.deadline)
            .collect()
    }

    /// Fires the pending timer with the earliest deadline.
    ///
    /// Returns false if nothing is pending.
    pub fn fire_next(&self) -> bool {
        let callback = {
            let mut state = self.state.lock().unwrap();
            state
                .timers
                .iter_mut()
                .filter(|t| t.is_pending())
                .min_by_key(|t| t.deadline)
                .and_then(|t| t.callback.take())
        };

        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Fires the `index`-th armed timer (0-based) even if it was cancelled.
    ///
    /// Models a firing that was already in flight when `cancel` ran.
    pub fn fire_unchecked(&self, index: usize) -> bool {
        let callback = {
            let mut state = self.state.lock().unwrap();
            state
                .timers
                .get_mut(index)
                .and_then(|t| t.callback.take())
        };

        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl TimerDriver for MockTimerDriver {
    fn arm(&self, deadline: Instant, on_fire: FireCallback) -> Result<TimerHandle, ClockError> {
        let mut state = self.state.lock().unwrap();
        if state.should_fail {
            return Err(ClockError::ArmFailed("Mock failure".to_string()));
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        state.timers.push(ArmedTimer {
            deadline,
            callback: Some(on_fire),
            cancelled: Arc::clone(&cancelled),
        });
        Ok(TimerHandle::new(cancelled))
    }
}

impl fmt::Debug for MockTimerDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTimerDriver")
            .field("arm_count", &self.arm_count())
            .field("pending_count", &self.pending_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
