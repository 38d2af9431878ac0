//! Timers: intervals, one-shot timeouts, debounce and throttle.
//!
//! A single shared timer thread manages every timer in the process, avoiding
//! one OS thread per timer. Entries live in a min-heap keyed by fire time;
//! the thread sleeps on a condvar until the earliest entry is due.
//!
//! Timer hygiene is a correctness requirement, not an optimization: every
//! owner of a timer handle is responsible for stopping it on teardown, and a
//! handle that is stopped never fires again. The hooks in this crate route
//! all their teardown paths (release, reconfigure, drop) through a single
//! cancellation point.

use std::collections::BinaryHeap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

static TIMER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Callback invoked when a timer fires.
type TimerCallback = Arc<dyn Fn() + Send + Sync>;

/// Shared timer manager that handles all timers with a single thread.
struct TimerManager {
    /// Priority queue of pending timer events (earliest first).
    timers: Mutex<BinaryHeap<TimerEntry>>,
    /// Wakes the timer thread when a new timer is added.
    condvar: Condvar,
    /// Whether the timer thread is running.
    running: AtomicBool,
}

#[derive(Clone)]
struct TimerEntry {
    id: u64,
    next_fire: Instant,
    /// `Some` for repeating timers, `None` for one-shots.
    period: Option<Duration>,
    callback: TimerCallback,
    running: Arc<AtomicBool>,
}

// BinaryHeap is a max-heap, we want min-heap behavior (earliest first)
impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.next_fire.cmp(&self.next_fire)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TimerEntry {}

impl TimerManager {
    fn new() -> Self {
        Self {
            timers: Mutex::new(BinaryHeap::new()),
            condvar: Condvar::new(),
            running: AtomicBool::new(true),
        }
    }

    fn add_timer(&self, entry: TimerEntry) {
        let mut timers = self
            .timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        timers.push(entry);
        self.condvar.notify_one();
    }

    fn run(&self) {
        loop {
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let mut timers = self
                .timers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            if timers.is_empty() {
                drop(
                    self.condvar
                        .wait(timers)
                        .unwrap_or_else(|poisoned| poisoned.into_inner()),
                );
                continue;
            }

            let next_fire = match timers.peek() {
                Some(entry) => entry.next_fire,
                None => continue,
            };
            let now = Instant::now();

            if next_fire > now {
                let wait_duration = next_fire - now;
                drop(
                    self.condvar
                        .wait_timeout(timers, wait_duration)
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .0,
                );
                continue;
            }

            // Fire timers that are due. Callbacks run outside the heap lock
            // so they may register new timers.
            let mut due = Vec::new();
            while let Some(entry) = timers.peek() {
                if entry.next_fire > now {
                    break;
                }
                let entry = match timers.pop() {
                    Some(entry) => entry,
                    None => break,
                };
                // Skip cancelled timers.
                if !entry.running.load(Ordering::SeqCst) {
                    continue;
                }
                due.push(entry);
            }
            drop(timers);

            let mut to_reschedule = Vec::new();
            for mut entry in due {
                if catch_unwind(AssertUnwindSafe(|| (entry.callback)())).is_err() {
                    tracing::warn!(timer_id = entry.id, "timer callback panicked");
                }
                match entry.period {
                    Some(period) => {
                        entry.next_fire = now + period;
                        to_reschedule.push(entry);
                    }
                    None => {
                        // One-shot: mark finished so handles report not running.
                        entry.running.store(false, Ordering::SeqCst);
                    }
                }
            }

            if !to_reschedule.is_empty() {
                let mut timers = self
                    .timers
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                for entry in to_reschedule {
                    timers.push(entry);
                }
            }
        }
    }
}

static TIMER_MANAGER: OnceLock<Arc<TimerManager>> = OnceLock::new();

fn get_timer_manager() -> &'static Arc<TimerManager> {
    TIMER_MANAGER.get_or_init(|| {
        let manager = Arc::new(TimerManager::new());
        let manager_clone = manager.clone();

        let spawn_result = thread::Builder::new()
            .name("tui-hooks-timer".into())
            .spawn(move || {
                manager_clone.run();
            });
        if spawn_result.is_err() {
            manager.running.store(false, Ordering::SeqCst);
            tracing::error!("failed to spawn timer thread; timers are disabled");
        }

        manager
    })
}

fn schedule(delay: Duration, period: Option<Duration>, callback: TimerCallback) -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let entry = TimerEntry {
        id: TIMER_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
        next_fire: Instant::now() + delay,
        period,
        callback,
        running: running.clone(),
    };

    let manager = get_timer_manager();
    if !manager.running.load(Ordering::SeqCst) {
        running.store(false, Ordering::SeqCst);
        return running;
    }
    manager.add_timer(entry);
    running
}

/// Handle to a repeating timer.
#[derive(Clone)]
pub struct IntervalHandle {
    running: Arc<AtomicBool>,
}

impl IntervalHandle {
    /// Whether the interval is still scheduled.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the interval. Idempotent; a stopped interval never fires again.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for IntervalHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

/// Handle to a one-shot timer.
#[derive(Clone)]
pub struct TimeoutHandle {
    running: Arc<AtomicBool>,
}

impl TimeoutHandle {
    /// Whether the timeout is still pending (not fired, not cancelled).
    pub fn is_pending(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Cancel the timeout if it has not fired yet. Idempotent.
    pub fn cancel(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for TimeoutHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutHandle")
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Run `callback` every `period` until the returned handle is stopped.
///
/// All intervals share a single timer thread; creating many is cheap
/// (O(log n) per fire for n active timers). Dropping the handle does *not*
/// stop the interval — owners that want teardown-on-drop wrap the handle.
pub fn use_interval<F>(period: Duration, callback: F) -> IntervalHandle
where
    F: Fn() + Send + Sync + 'static,
{
    let running = schedule(period, Some(period), Arc::new(callback));
    IntervalHandle { running }
}

/// Run `callback` once after `delay`, unless cancelled first.
pub fn use_timeout<F>(delay: Duration, callback: F) -> TimeoutHandle
where
    F: Fn() + Send + Sync + 'static,
{
    let running = schedule(delay, None, Arc::new(callback));
    TimeoutHandle { running }
}

/// Trailing-edge debouncer: the callback runs `delay` after the most recent
/// [`call`](Self::call), with earlier pending runs cancelled first.
///
/// At most one timeout is pending at a time; dropping the debouncer cancels
/// any pending run.
pub struct Debouncer {
    delay: Duration,
    callback: TimerCallback,
    pending: parking_lot::Mutex<Option<TimeoutHandle>>,
}

impl Debouncer {
    /// Create a debouncer around `callback`.
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: parking_lot::Mutex::new(None),
        }
    }

    /// Schedule (or re-schedule) the callback. With a zero delay the callback
    /// runs synchronously.
    pub fn call(&self) {
        if self.delay.is_zero() {
            self.cancel();
            (self.callback)();
            return;
        }
        let mut pending = self.pending.lock();
        if let Some(prev) = pending.take() {
            prev.cancel();
        }
        let callback = Arc::clone(&self.callback);
        *pending = Some(use_timeout(self.delay, move || callback()));
    }

    /// Cancel any pending run.
    pub fn cancel(&self) {
        if let Some(prev) = self.pending.lock().take() {
            prev.cancel();
        }
    }

    /// Whether a run is pending.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(TimeoutHandle::is_pending)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Leading-edge throttler with a trailing sample: the first [`call`](Self::call)
/// runs the callback immediately; calls arriving within `interval` coalesce
/// into a single trailing run at the end of the window.
pub struct Throttler {
    interval: Duration,
    callback: TimerCallback,
    state: parking_lot::Mutex<ThrottleState>,
}

#[derive(Default)]
struct ThrottleState {
    last_fire: Option<Instant>,
    trailing: Option<TimeoutHandle>,
}

impl Throttler {
    /// Create a throttler around `callback`.
    pub fn new<F>(interval: Duration, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            interval,
            callback: Arc::new(callback),
            state: parking_lot::Mutex::new(ThrottleState::default()),
        }
    }

    /// Record a call, firing now or coalescing into the trailing sample.
    pub fn call(&self) {
        if self.interval.is_zero() {
            (self.callback)();
            return;
        }
        let now = Instant::now();
        let mut state = self.state.lock();
        let elapsed = state.last_fire.map(|at| now.duration_since(at));
        match elapsed {
            None => {
                state.last_fire = Some(now);
                drop(state);
                (self.callback)();
            }
            Some(elapsed) if elapsed >= self.interval => {
                if let Some(trailing) = state.trailing.take() {
                    trailing.cancel();
                }
                state.last_fire = Some(now);
                drop(state);
                (self.callback)();
            }
            Some(elapsed) => {
                // Inside the window: arrange one trailing run at its end.
                if state
                    .trailing
                    .as_ref()
                    .is_some_and(TimeoutHandle::is_pending)
                {
                    return;
                }
                let remaining = self.interval - elapsed;
                let callback = Arc::clone(&self.callback);
                state.trailing = Some(use_timeout(remaining, move || callback()));
                state.last_fire = Some(now + remaining);
            }
        }
    }

    /// Cancel any pending trailing run.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if let Some(trailing) = state.trailing.take() {
            trailing.cancel();
        }
    }
}

impl Drop for Throttler {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Throttler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttler")
            .field("interval", &self.interval)
            .finish()
    }
}
