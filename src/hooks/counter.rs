//! Bounded counter state.

use crate::hooks::signal::Signal;

/// Configuration for [`use_counter`].
#[derive(Debug, Clone, Copy)]
pub struct CounterOptions {
    /// Lower bound, inclusive.
    pub min: Option<f64>,
    /// Upper bound, inclusive.
    pub max: Option<f64>,
    /// Step applied by `increment`/`decrement`. Non-finite steps fall back
    /// to the default of 1.
    pub step: f64,
}

impl Default for CounterOptions {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            step: 1.0,
        }
    }
}

impl CounterOptions {
    /// Defaults: unbounded, step 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the step.
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}

/// Reactive counter clamped to `[min, max]`.
///
/// Invalid numeric input is rejected silently: a `NaN` or infinite value
/// passed to [`set`](Self::set) leaves the prior valid value in place.
#[derive(Clone)]
pub struct Counter {
    value: Signal<f64>,
    initial: f64,
    min: Option<f64>,
    max: Option<f64>,
    step: f64,
}

/// Create a [`Counter`] starting at `initial` (clamped into bounds; a
/// non-finite initial value starts at the nearest bound or 0).
pub fn use_counter(initial: f64, options: CounterOptions) -> Counter {
    let step = if options.step.is_finite() {
        options.step
    } else {
        1.0
    };
    let initial = if initial.is_finite() { initial } else { 0.0 };
    let start = clamp_to(initial, options.min, options.max);
    Counter {
        value: Signal::new(start),
        initial,
        min: options.min,
        max: options.max,
        step,
    }
}

fn clamp_to(mut value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    if let Some(max) = max {
        value = value.min(max);
    }
    if let Some(min) = min {
        value = value.max(min);
    }
    value
}

impl Counter {
    /// Current value.
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    /// The value signal, for reactive access.
    pub fn signal(&self) -> Signal<f64> {
        self.value.clone()
    }

    /// Add the step, clamped to the upper bound.
    pub fn increment(&self) {
        self.apply(self.get() + self.step);
    }

    /// Subtract the step, clamped to the lower bound.
    pub fn decrement(&self) {
        self.apply(self.get() - self.step);
    }

    /// Set the value, clamped into bounds. Non-finite input is rejected
    /// silently and the prior value retained.
    pub fn set(&self, value: f64) {
        self.apply(value);
    }

    /// Reset to the initial value (clamped).
    pub fn reset(&self) {
        self.value.set_if_changed(self.clamp(self.initial));
    }

    /// Whether the value sits at the lower bound.
    pub fn is_min(&self) -> bool {
        self.min.is_some_and(|min| self.get() <= min)
    }

    /// Whether the value sits at the upper bound.
    pub fn is_max(&self) -> bool {
        self.max.is_some_and(|max| self.get() >= max)
    }

    fn apply(&self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.value.set_if_changed(self.clamp(value));
    }

    fn clamp(&self, value: f64) -> f64 {
        clamp_to(value, self.min, self.max)
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Counter")
            .field("value", &self.get())
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_decrement() {
        let counter = use_counter(0.0, CounterOptions::new().step(2.0));
        counter.increment();
        counter.increment();
        assert_eq!(counter.get(), 4.0);
        counter.decrement();
        assert_eq!(counter.get(), 2.0);
    }

    #[test]
    fn test_bounds_clamp() {
        let counter = use_counter(5.0, CounterOptions::new().min(0.0).max(5.0));
        assert!(counter.is_max());

        counter.increment();
        assert_eq!(counter.get(), 5.0);

        counter.set(-10.0);
        assert_eq!(counter.get(), 0.0);
        assert!(counter.is_min());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let counter = use_counter(3.0, CounterOptions::new());
        counter.set(f64::NAN);
        assert_eq!(counter.get(), 3.0);
        counter.set(f64::INFINITY);
        assert_eq!(counter.get(), 3.0);
        counter.set(f64::NEG_INFINITY);
        assert_eq!(counter.get(), 3.0);
    }

    #[test]
    fn test_non_finite_step_falls_back() {
        let counter = use_counter(0.0, CounterOptions::new().step(f64::NAN));
        counter.increment();
        assert_eq!(counter.get(), 1.0);
    }

    #[test]
    fn test_reset() {
        let counter = use_counter(7.0, CounterOptions::new());
        counter.set(100.0);
        counter.reset();
        assert_eq!(counter.get(), 7.0);
    }

    #[test]
    fn test_initial_clamped_into_bounds() {
        let counter = use_counter(99.0, CounterOptions::new().max(10.0));
        assert_eq!(counter.get(), 10.0);
    }

    #[test]
    fn test_set_equal_value_does_not_republish() {
        let counter = use_counter(3.0, CounterOptions::new());
        let version = counter.signal().version();
        counter.set(3.0);
        assert_eq!(counter.signal().version(), version);
    }
}
