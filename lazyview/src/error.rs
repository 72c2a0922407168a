use thiserror::Error;

/// A caller supplied a parameter that would make a primitive misbehave.
///
/// These are rejected at construction/call time instead of being clamped, so a zero item height
/// can never reach the range math as a division by zero.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("item height must be greater than zero")]
    ZeroItemHeight,

    #[error("container height must be greater than zero")]
    ZeroContainerHeight,

    #[error("debounce delay must be greater than zero")]
    ZeroDelay,

    #[error("throttle limit must be greater than zero")]
    ZeroLimit,

    /// Visibility thresholds are intersection ratios and must lie in `[0, 1]`.
    ///
    /// `0` is accepted and means "any overlap": a target fires on the first positive ratio. A
    /// ratio of exactly `0` reports a target that does not intersect, so it never fires.
    #[error("visibility threshold {0} is outside [0, 1]")]
    InvalidThreshold(f32),
}

pub(crate) fn check_threshold(threshold: f32) -> Result<f32, ConfigError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}
