//! One-shot visibility observation for deferred loading.
//!
//! The UI layer owns the real intersection machinery (DOM observer, layout pass, ...). It
//! forwards each intersection ratio it measures for a target into a subscription, which
//! reports the first time the ratio reaches the threshold and then deactivates for good.

use alloc::vec::Vec;

use crate::ConfigError;
use crate::error::check_threshold;

/// Intersection ratio at which a target counts as visible unless configured otherwise.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// A one-shot visibility subscription for a single target.
///
/// Feeding it ratios yields a short stream of booleans: `Some(false)` while the target is not
/// visible enough, a single `Some(true)` once it is, then `None` forever. Disposing it ends the
/// stream early.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilitySubscription<H> {
    target: H,
    threshold: f32,
    fired: bool,
    disposed: bool,
}

/// Starts observing `target`. `threshold` is the intersection ratio in `[0, 1]` that counts as
/// visible; a ratio of `0` never does, so a threshold of `0` fires on the first overlap.
pub fn observe_visibility<H>(
    target: H,
    threshold: f32,
) -> Result<VisibilitySubscription<H>, ConfigError> {
    let threshold = check_threshold(threshold)?;
    Ok(VisibilitySubscription {
        target,
        threshold,
        fired: false,
        disposed: false,
    })
}

impl<H> VisibilitySubscription<H> {
    pub fn target(&self) -> &H {
        &self.target
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether the target was seen at or above the threshold.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn is_active(&self) -> bool {
        !self.fired && !self.disposed
    }

    /// Feeds one measured intersection ratio.
    pub fn report(&mut self, ratio: f32) -> Option<bool> {
        if !self.is_active() {
            return None;
        }
        if ratio > 0.0 && ratio >= self.threshold {
            self.fired = true;
            return Some(true);
        }
        Some(false)
    }

    /// Stops observing without firing. Safe to call any number of times.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }
}

/// Multiplexes one-shot subscriptions for many targets sharing a threshold, the way a single
/// intersection observer instance serves many elements.
///
/// Targets are dropped from the observer as soon as they fire.
#[derive(Clone, Debug)]
pub struct VisibilityObserver<H> {
    threshold: f32,
    subscriptions: Vec<VisibilitySubscription<H>>,
}

impl<H: PartialEq> VisibilityObserver<H> {
    pub fn new(threshold: f32) -> Result<Self, ConfigError> {
        Ok(Self {
            threshold: check_threshold(threshold)?,
            subscriptions: Vec::new(),
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn is_observing(&self, target: &H) -> bool {
        self.subscriptions.iter().any(|s| s.target() == target)
    }

    /// Registers `target`. Returns `false` if it is already being observed.
    pub fn observe(&mut self, target: H) -> bool {
        if self.is_observing(&target) {
            return false;
        }
        self.subscriptions.push(VisibilitySubscription {
            target,
            threshold: self.threshold,
            fired: false,
            disposed: false,
        });
        true
    }

    /// Forwards a ratio for `target`. Returns `true` if this made it visible.
    ///
    /// Reports for unknown (or already fired) targets are ignored.
    pub fn report(&mut self, target: &H, ratio: f32) -> bool {
        let Some(pos) = self.subscriptions.iter().position(|s| s.target() == target) else {
            return false;
        };
        if self.subscriptions[pos].report(ratio) == Some(true) {
            self.subscriptions.swap_remove(pos);
            ltrace!(
                ratio,
                remaining = self.subscriptions.len(),
                "VisibilityObserver: fired"
            );
            return true;
        }
        false
    }

    /// Forwards a batch of `(target, ratio)` entries and returns the targets that became
    /// visible, in entry order.
    pub fn report_batch<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a H, f32)>,
    ) -> Vec<&'a H>
    where
        H: 'a,
    {
        entries
            .into_iter()
            .filter(|(target, ratio)| self.report(target, *ratio))
            .map(|(target, _)| target)
            .collect()
    }

    pub fn unobserve(&mut self, target: &H) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.target() != target);
        before != self.subscriptions.len()
    }

    pub fn disconnect(&mut self) {
        self.subscriptions.clear();
    }
}
