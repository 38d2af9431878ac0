//! Connectivity status with graceful degradation.
//!
//! Terminals have no `navigator.onLine`; connectivity comes from a
//! caller-supplied probe. A probe returning `None` means the environment
//! cannot answer at all, which is surfaced as `supported = false` — never an
//! error. With no probe configured the hook reports unsupported and assumes
//! online, matching the browser convention when the API is missing.

use crate::hooks::interval::{use_interval, IntervalHandle};
use crate::hooks::signal::Signal;
use std::sync::Arc;
use std::time::Duration;

/// Connectivity probe: `Some(online)` or `None` when undeterminable.
pub type OnlineProbe = Arc<dyn Fn() -> Option<bool> + Send + Sync>;

/// Published connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnlineState {
    /// Whether the environment can answer the question at all.
    pub supported: bool,
    /// Last known connectivity; `true` when unsupported.
    pub is_online: bool,
}

/// Configuration for [`use_online`].
#[derive(Clone)]
pub struct OnlineOptions {
    /// Connectivity probe; absent means unsupported.
    pub probe: Option<OnlineProbe>,
    /// Poll period for re-probing.
    pub poll: Duration,
}

impl Default for OnlineOptions {
    fn default() -> Self {
        Self {
            probe: None,
            poll: Duration::from_secs(5),
        }
    }
}

impl OnlineOptions {
    /// Defaults: no probe (unsupported), 5 s poll.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `probe` to determine connectivity.
    pub fn probe<F>(mut self, probe: F) -> Self
    where
        F: Fn() -> Option<bool> + Send + Sync + 'static,
    {
        self.probe = Some(Arc::new(probe));
        self
    }

    /// Set the poll period.
    pub fn poll(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }
}

impl std::fmt::Debug for OnlineOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnlineOptions")
            .field("probe", &self.probe.is_some())
            .field("poll", &self.poll)
            .finish()
    }
}

/// Handle to a connectivity tracker. Dropping it stops the poller.
pub struct Online {
    state: Signal<OnlineState>,
    probe: Option<OnlineProbe>,
    poller: Option<IntervalHandle>,
}

impl Online {
    /// Snapshot of the current state.
    pub fn state(&self) -> OnlineState {
        self.state.get()
    }

    /// The state signal, for reactive access.
    pub fn signal(&self) -> Signal<OnlineState> {
        self.state.clone()
    }

    /// Last known connectivity.
    pub fn is_online(&self) -> bool {
        self.state.with(|s| s.is_online)
    }

    /// Whether connectivity can be determined in this environment.
    pub fn supported(&self) -> bool {
        self.state.with(|s| s.supported)
    }

    /// Re-run the probe now instead of waiting for the next poll.
    pub fn refresh(&self) {
        if let Some(probe) = &self.probe {
            apply_probe(&self.state, probe);
        }
    }
}

impl Drop for Online {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }
}

impl std::fmt::Debug for Online {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Online").field("state", &self.state()).finish()
    }
}

fn apply_probe(state: &Signal<OnlineState>, probe: &OnlineProbe) {
    let next = match probe() {
        Some(is_online) => OnlineState {
            supported: true,
            is_online,
        },
        None => OnlineState {
            supported: false,
            is_online: true,
        },
    };
    state.set_if_changed(next);
}

/// Track connectivity by polling a probe.
pub fn use_online(options: OnlineOptions) -> Online {
    let state = Signal::new(OnlineState {
        supported: false,
        is_online: true,
    });

    let Some(probe) = options.probe else {
        return Online {
            state,
            probe: None,
            poller: None,
        };
    };

    apply_probe(&state, &probe);

    let poller = {
        let state = state.clone();
        let probe = Arc::clone(&probe);
        use_interval(options.poll, move || {
            apply_probe(&state, &probe);
        })
    };

    Online {
        state,
        probe: Some(probe),
        poller: Some(poller),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_no_probe_is_unsupported_but_online() {
        let online = use_online(OnlineOptions::new());
        assert!(!online.supported());
        assert!(online.is_online());
    }

    #[test]
    fn test_probe_drives_state() {
        let flag = Arc::new(AtomicBool::new(true));
        let f = flag.clone();
        let online = use_online(
            OnlineOptions::new()
                .probe(move || Some(f.load(Ordering::SeqCst)))
                .poll(Duration::from_secs(60)),
        );
        assert!(online.supported());
        assert!(online.is_online());

        flag.store(false, Ordering::SeqCst);
        online.refresh();
        assert!(!online.is_online());
    }

    #[test]
    fn test_probe_returning_none_degrades() {
        let online = use_online(
            OnlineOptions::new()
                .probe(|| None)
                .poll(Duration::from_secs(60)),
        );
        assert!(!online.supported());
        assert!(online.is_online());
    }

    #[test]
    fn test_drop_stops_poller() {
        let online = use_online(
            OnlineOptions::new()
                .probe(|| Some(true))
                .poll(Duration::from_millis(10)),
        );
        let poller = online.poller.as_ref().map(IntervalHandle::clone);
        drop(online);
        assert!(!poller.expect("poller exists").is_running());
    }
}
