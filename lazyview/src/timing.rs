//! Rate-limiting primitives that turn a rapidly changing input into a calmer output.
//!
//! Both types are adapter-driven: they never spawn timers. The host feeds inputs with `set`,
//! calls `tick(now_ms)` from its frame loop or from a single timer armed at
//! [`next_deadline_ms`](Debounce::next_deadline_ms), and reads the output with `value()`.
//! Dropping an instance drops its pending update with it; `cancel` does the same explicitly on
//! teardown paths that keep the instance alive.

use crate::{ConfigError, LazyViewOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending<T> {
    value: T,
    due_ms: u64,
}

/// Trailing debounce: the output takes the latest input only after `delay_ms` without a newer
/// one. Intermediate inputs are dropped.
#[derive(Clone, Debug)]
pub struct Debounce<T> {
    value: T,
    delay_ms: u64,
    last_fired_ms: Option<u64>,
    pending: Option<Pending<T>>,
}

impl<T> Debounce<T> {
    pub fn new(initial: T, delay_ms: u64) -> Result<Self, ConfigError> {
        if delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        Ok(Self {
            value: initial,
            delay_ms,
            last_fired_ms: None,
            pending: None,
        })
    }

    pub fn from_options(initial: T, options: &LazyViewOptions) -> Result<Self, ConfigError> {
        Self::new(initial, options.debounce_ms)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn last_fired_ms(&self) -> Option<u64> {
        self.last_fired_ms
    }

    /// Replaces any pending input and restarts the quiet window at `now_ms`.
    pub fn set(&mut self, value: T, now_ms: u64) {
        self.pending = Some(Pending {
            value,
            due_ms: now_ms.saturating_add(self.delay_ms),
        });
    }

    /// Publishes the pending input once its quiet window has elapsed.
    ///
    /// Returns `true` when the output changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.pending.take() {
            Some(p) if now_ms >= p.due_ms => {
                ltrace!(now_ms, due_ms = p.due_ms, "Debounce: fired");
                self.value = p.value;
                self.last_fired_ms = Some(now_ms);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Throttle with trailing-edge delivery: at most one output change per `limit_ms` window.
///
/// An input arriving after a full window has passed is published immediately. Otherwise it is
/// parked until the window closes; a newer input replaces the parked one, so the value
/// published at the trailing edge is always the most recent.
#[derive(Clone, Debug)]
pub struct Throttle<T> {
    value: T,
    limit_ms: u64,
    last_fired_ms: u64,
    pending: Option<Pending<T>>,
}

impl<T> Throttle<T> {
    /// Creates a throttle whose first window starts at `now_ms`.
    pub fn new(initial: T, limit_ms: u64, now_ms: u64) -> Result<Self, ConfigError> {
        if limit_ms == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        Ok(Self {
            value: initial,
            limit_ms,
            last_fired_ms: now_ms,
            pending: None,
        })
    }

    pub fn from_options(
        initial: T,
        options: &LazyViewOptions,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(initial, options.throttle_ms, now_ms)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn limit_ms(&self) -> u64 {
        self.limit_ms
    }

    pub fn last_fired_ms(&self) -> u64 {
        self.last_fired_ms
    }

    /// Offers a new input. Returns `true` when it was published immediately.
    pub fn set(&mut self, value: T, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_fired_ms) >= self.limit_ms {
            self.pending = None;
            self.fire(value, now_ms);
            return true;
        }
        self.pending = Some(Pending {
            value,
            due_ms: self.last_fired_ms.saturating_add(self.limit_ms),
        });
        false
    }

    /// Publishes the parked input if its window has closed. Returns `true` when the output
    /// changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.pending.take() {
            Some(p) if now_ms >= p.due_ms => {
                self.fire(p.value, now_ms);
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn into_value(self) -> T {
        self.value
    }

    fn fire(&mut self, value: T, now_ms: u64) {
        ltrace!(
            now_ms,
            since_last_ms = now_ms.saturating_sub(self.last_fired_ms),
            "Throttle: fired"
        );
        self.value = value;
        self.last_fired_ms = now_ms;
    }
}
