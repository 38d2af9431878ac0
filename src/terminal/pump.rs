//! Terminal event pump.
//!
//! Reads crossterm events and dispatches them into an [`EventTarget`].
//! Applications embed the pump in their own event loop with [`run`], or let
//! it own a background thread with [`spawn`].

use crate::error::HookError;
use crate::hooks::EventTarget;
use crate::terminal::Event;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Poll granularity: how often the pump re-checks the shutdown flag while
/// waiting for events.
const POLL_PERIOD: Duration = Duration::from_millis(50);

/// Read events and dispatch them into `target` until `shutdown` is set.
///
/// Runs on the caller's thread. Read errors from the terminal propagate as
/// [`HookError::Io`].
pub fn run(target: &EventTarget, shutdown: &AtomicBool) -> Result<(), HookError> {
    while !shutdown.load(Ordering::Acquire) {
        if !crossterm::event::poll(POLL_PERIOD)? {
            continue;
        }
        let raw = crossterm::event::read()?;
        if let Some(event) = Event::from_crossterm(raw) {
            tracing::trace!(kind = ?event.kind(), "dispatching terminal event");
            target.dispatch(&event);
        }
    }
    Ok(())
}

/// Handle to a background pump thread. Dropping it (or calling
/// [`stop`](Self::stop)) signals shutdown and joins the thread.
pub struct PumpHandle {
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PumpHandle {
    /// Signal shutdown and wait for the pump thread to exit.
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("event pump thread panicked");
            }
        }
    }
}

impl Drop for PumpHandle {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

impl std::fmt::Debug for PumpHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PumpHandle")
            .field("shutdown", &self.shutdown.load(Ordering::Acquire))
            .finish()
    }
}

/// Run the pump on a named background thread, dispatching into `target`.
///
/// Read errors on the background thread are logged and end the pump.
pub fn spawn(target: EventTarget) -> std::io::Result<PumpHandle> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    let thread = std::thread::Builder::new()
        .name("tui-hooks-pump".into())
        .spawn(move || {
            if let Err(error) = run(&target, &flag) {
                tracing::error!(%error, "event pump exited with error");
            }
        })?;
    Ok(PumpHandle {
        shutdown,
        thread: Some(thread),
    })
}
