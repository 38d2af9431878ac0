//! Key-combination tracking.
//!
//! [`use_key_press`] watches one key or an ordered combination of keys on an
//! event target and publishes whether the full combination is currently held,
//! which key completed it, when it was activated, and a live hold duration
//! sampled at ~60 Hz.
//!
//! Key names are case-insensitive and normalized before comparison
//! (`"Control"` and `"ctrl"` are the same key); a caller-supplied
//! [`KeyMappings`] table can fold locale keys onto canonical ones, e.g. a
//! Hangul jamo sharing a physical position with a Latin letter.
//!
//! Each tracker owns its held-key set, sampler, and subscriptions; multiple
//! trackers on the same target do not interfere — each filters events by its
//! own target set before reacting.

use crate::hooks::interval::{use_interval, IntervalHandle};
use crate::hooks::listener::{EventResult, EventTarget, Subscription};
use crate::hooks::signal::Signal;
use crate::terminal::{Event, EventKind, KeyCode};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sampling period for the live hold duration (~60 Hz).
pub const HOLD_SAMPLE_PERIOD: Duration = Duration::from_millis(16);

/// Canonical, comparable form of a key identifier: lower-cased, with the
/// `"control"` alias collapsed to `"ctrl"`. Idempotent; empty in, empty out.
pub fn normalize_key(key: &str) -> String {
    let lowered = key.to_lowercase();
    if lowered == "control" {
        "ctrl".to_owned()
    } else {
        lowered
    }
}

/// Locale-key to canonical-key mapping table.
///
/// Entries are keyed by the *normalized* form of the locale key and consulted
/// after an event's key name has been normalized; the mapped value replaces
/// the key for all subsequent comparisons.
#[derive(Debug, Clone, Default)]
pub struct KeyMappings {
    map: FxHashMap<String, String>,
}

impl KeyMappings {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping from `locale` to `canonical`. Both sides are normalized.
    pub fn map(mut self, locale: impl AsRef<str>, canonical: impl AsRef<str>) -> Self {
        self.map.insert(
            normalize_key(locale.as_ref()),
            normalize_key(canonical.as_ref()),
        );
        self
    }

    /// Look up the canonical form of an already-normalized key.
    pub fn resolve(&self, normalized: &str) -> Option<&str> {
        self.map.get(normalized).map(String::as_str)
    }

    /// Number of mappings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<L: AsRef<str>, C: AsRef<str>> FromIterator<(L, C)> for KeyMappings {
    fn from_iter<I: IntoIterator<Item = (L, C)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |table, (locale, canonical)| {
                table.map(locale, canonical)
            })
    }
}

/// One key or an ordered combination of keys, case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    keys: SmallVec<[String; 4]>,
}

impl KeySpec {
    /// The raw key names as supplied.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Normalized target list, duplicates removed, order preserved.
    fn normalized(&self) -> SmallVec<[String; 4]> {
        let mut out: SmallVec<[String; 4]> = SmallVec::new();
        for key in &self.keys {
            let normalized = normalize_key(key);
            if !out.contains(&normalized) {
                out.push(normalized);
            }
        }
        out
    }
}

impl From<&str> for KeySpec {
    fn from(key: &str) -> Self {
        Self {
            keys: smallvec::smallvec![key.to_owned()],
        }
    }
}

impl From<String> for KeySpec {
    fn from(key: String) -> Self {
        Self {
            keys: smallvec::smallvec![key],
        }
    }
}

impl From<KeyCode> for KeySpec {
    fn from(code: KeyCode) -> Self {
        Self {
            keys: smallvec::smallvec![code.name().into_owned()],
        }
    }
}

impl From<Vec<String>> for KeySpec {
    fn from(keys: Vec<String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl From<Vec<&str>> for KeySpec {
    fn from(keys: Vec<&str>) -> Self {
        Self {
            keys: keys.into_iter().map(str::to_owned).collect(),
        }
    }
}

impl From<&[&str]> for KeySpec {
    fn from(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| (*k).to_owned()).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for KeySpec {
    fn from(keys: [&str; N]) -> Self {
        Self {
            keys: keys.iter().map(|k| (*k).to_owned()).collect(),
        }
    }
}

/// Published tracker state. All fields are empty while the combination is not
/// fully held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPressState {
    /// Whether every target key is currently held.
    pub is_pressed: bool,
    /// Raw (non-normalized) key that completed the most recent activation.
    pub key_code: Option<KeyCode>,
    /// When the combination became fully held.
    pub pressed_at: Option<Instant>,
    /// Time elapsed since activation, refreshed every [`HOLD_SAMPLE_PERIOD`].
    pub hold_duration: Option<Duration>,
}

/// Configuration for [`use_key_press`].
#[derive(Debug, Clone, Default)]
pub struct KeyPressOptions {
    /// Event source; defaults to the process default target.
    pub target: Option<EventTarget>,
    /// Consume matched key events so later handlers never see them.
    pub prevent_default: bool,
    /// Start disabled. Disabling later does not clear an active combination.
    pub disabled: bool,
    /// Skip the key-down subscription.
    pub no_keydown: bool,
    /// Skip the key-up subscription.
    pub no_keyup: bool,
    /// Locale-key mapping table.
    pub key_mappings: KeyMappings,
}

impl KeyPressOptions {
    /// Defaults: default target, both subscriptions, enabled, no mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track events on `target` instead of the process default.
    pub fn target(mut self, target: &EventTarget) -> Self {
        self.target = Some(target.clone());
        self
    }

    /// Consume matched key events.
    pub fn prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = prevent;
        self
    }

    /// Whether the tracker starts enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.disabled = !enabled;
        self
    }

    /// Whether to subscribe to key-down events.
    pub fn keydown(mut self, keydown: bool) -> Self {
        self.no_keydown = !keydown;
        self
    }

    /// Whether to subscribe to key-up events.
    pub fn keyup(mut self, keyup: bool) -> Self {
        self.no_keyup = !keyup;
        self
    }

    /// Use `mappings` to fold locale keys onto canonical ones.
    pub fn key_mappings(mut self, mappings: KeyMappings) -> Self {
        self.key_mappings = mappings;
        self
    }
}

struct TrackerInner {
    /// Normalized target key list.
    targets: Mutex<SmallVec<[String; 4]>>,
    /// Normalized+mapped keys currently physically held.
    held: Mutex<FxHashSet<String>>,
    state: Signal<KeyPressState>,
    mappings: KeyMappings,
    prevent_default: bool,
    enabled: AtomicBool,
    /// The hold-duration sampler. At most one per tracker; every teardown
    /// path (release, reconfigure, drop) goes through [`Self::stop_sampler`].
    sampler: Mutex<Option<IntervalHandle>>,
}

impl TrackerInner {
    /// Normalized+mapped form of an event's key, used for all comparisons.
    fn canonical(&self, code: KeyCode) -> String {
        let normalized = normalize_key(&code.name());
        match self.mappings.resolve(&normalized) {
            Some(mapped) => mapped.to_owned(),
            None => normalized,
        }
    }

    fn handle_key_down(self: &Arc<Self>, code: KeyCode) -> EventResult {
        if !self.enabled.load(Ordering::Acquire) {
            return EventResult::Ignored;
        }
        let name = self.canonical(code);
        let targets = self.targets.lock();
        if !targets.contains(&name) {
            return EventResult::Ignored;
        }
        let result = if self.prevent_default {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        };

        let mut held = self.held.lock();
        if !held.insert(name) {
            // OS auto-repeat: the key is already held.
            return result;
        }
        let satisfied = targets.iter().all(|key| held.contains(key));
        drop(held);
        drop(targets);

        if satisfied && !self.state.with(|s| s.is_pressed) {
            self.activate(code);
        }
        result
    }

    fn handle_key_up(&self, code: KeyCode) -> EventResult {
        if !self.enabled.load(Ordering::Acquire) {
            return EventResult::Ignored;
        }
        let name = self.canonical(code);
        let targets = self.targets.lock();
        if !targets.contains(&name) {
            return EventResult::Ignored;
        }
        let result = if self.prevent_default {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        };

        let mut held = self.held.lock();
        held.remove(&name);
        let satisfied = !targets.is_empty() && targets.iter().all(|key| held.contains(key));
        drop(held);
        drop(targets);

        if !satisfied && self.state.with(|s| s.is_pressed) {
            self.deactivate();
        }
        result
    }

    /// Idle -> Active: record the activation and start the sampler.
    fn activate(self: &Arc<Self>, code: KeyCode) {
        self.state.set(KeyPressState {
            is_pressed: true,
            key_code: Some(code),
            pressed_at: Some(Instant::now()),
            hold_duration: Some(Duration::ZERO),
        });
        self.start_sampler();
    }

    /// Active -> Idle: clear all derived fields and stop the sampler.
    fn deactivate(&self) {
        self.stop_sampler();
        self.state.set(KeyPressState::default());
    }

    fn start_sampler(self: &Arc<Self>) {
        let mut slot = self.sampler.lock();
        if let Some(prev) = slot.take() {
            prev.stop();
        }
        let weak = Arc::downgrade(self);
        *slot = Some(use_interval(HOLD_SAMPLE_PERIOD, move || {
            if let Some(inner) = weak.upgrade() {
                inner.sample_hold();
            }
        }));
    }

    fn stop_sampler(&self) {
        if let Some(sampler) = self.sampler.lock().take() {
            sampler.stop();
        }
    }

    fn sample_hold(&self) {
        self.state.update(|state| {
            if let (true, Some(at)) = (state.is_pressed, state.pressed_at) {
                state.hold_duration = Some(at.elapsed());
            }
        });
    }

    /// Hard reset: held-set cleared, state zeroed, sampler cancelled.
    fn reset(&self) {
        self.stop_sampler();
        self.held.lock().clear();
        self.state.set(KeyPressState::default());
    }
}

/// Handle to a key-combination tracker. Dropping it detaches the listeners
/// and cancels the hold-duration sampler.
pub struct KeyPress {
    inner: Arc<TrackerInner>,
    _keydown: Option<Subscription>,
    _keyup: Option<Subscription>,
}

impl KeyPress {
    /// Snapshot of the current tracker state.
    pub fn state(&self) -> KeyPressState {
        self.inner.state.get()
    }

    /// Whether the full combination is currently held.
    pub fn is_pressed(&self) -> bool {
        self.inner.state.with(|s| s.is_pressed)
    }

    /// The state signal, for reactive access.
    pub fn signal(&self) -> Signal<KeyPressState> {
        self.inner.state.clone()
    }

    /// Normalized target key list.
    pub fn keys(&self) -> Vec<String> {
        self.inner.targets.lock().to_vec()
    }

    /// Replace the target keys. This is a hard reset: held-set cleared,
    /// state zeroed, and the sampler cancelled, regardless of what is
    /// physically held.
    pub fn set_keys(&self, keys: impl Into<KeySpec>) {
        let spec: KeySpec = keys.into();
        *self.inner.targets.lock() = spec.normalized();
        self.inner.reset();
    }

    /// Enable or disable event processing. Disabling does not clear an
    /// already-active combination.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::Release);
    }

    /// Whether events are currently processed.
    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::Acquire)
    }
}

impl Drop for KeyPress {
    fn drop(&mut self) {
        self.inner.stop_sampler();
    }
}

impl std::fmt::Debug for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPress")
            .field("keys", &self.keys())
            .field("state", &self.state())
            .finish()
    }
}

/// Track a key or key combination on an event target.
///
/// ```
/// use tui_hooks::hooks::{use_key_press, EventTarget, KeyPressOptions};
/// use tui_hooks::terminal::{Event, KeyCode, KeyEvent};
///
/// let target = EventTarget::new();
/// let press = use_key_press("Enter", KeyPressOptions::new().target(&target));
///
/// target.dispatch(&Event::KeyDown(KeyEvent::new(KeyCode::Enter)));
/// assert!(press.is_pressed());
///
/// target.dispatch(&Event::KeyUp(KeyEvent::new(KeyCode::Enter)));
/// assert!(!press.is_pressed());
/// ```
pub fn use_key_press(keys: impl Into<KeySpec>, options: KeyPressOptions) -> KeyPress {
    let spec: KeySpec = keys.into();
    let target = options
        .target
        .unwrap_or_else(|| EventTarget::default_target().clone());

    let inner = Arc::new(TrackerInner {
        targets: Mutex::new(spec.normalized()),
        held: Mutex::new(FxHashSet::default()),
        state: Signal::new(KeyPressState::default()),
        mappings: options.key_mappings,
        prevent_default: options.prevent_default,
        enabled: AtomicBool::new(!options.disabled),
        sampler: Mutex::new(None),
    });

    let keydown = (!options.no_keydown).then(|| {
        let weak = Arc::downgrade(&inner);
        target.subscribe(EventKind::KeyDown, move |event| {
            let Some(inner) = weak.upgrade() else {
                return EventResult::Ignored;
            };
            match event {
                Event::KeyDown(key) => TrackerInner::handle_key_down(&inner, key.code),
                _ => EventResult::Ignored,
            }
        })
    });
    let keyup = (!options.no_keyup).then(|| {
        let weak = Arc::downgrade(&inner);
        target.subscribe(EventKind::KeyUp, move |event| {
            let Some(inner) = weak.upgrade() else {
                return EventResult::Ignored;
            };
            match event {
                Event::KeyUp(key) => inner.handle_key_up(key.code),
                _ => EventResult::Ignored,
            }
        })
    });

    KeyPress {
        inner,
        _keydown: keydown,
        _keyup: keyup,
    }
}
