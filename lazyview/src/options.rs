use crate::error::check_threshold;
use crate::{ConfigError, cache, visibility, window};

/// Default delay for [`crate::Debounce`] built from options.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Default window for [`crate::Throttle`] built from options.
pub const DEFAULT_THROTTLE_MS: u64 = 200;
pub const DEFAULT_ITEM_HEIGHT: u32 = 50;
pub const DEFAULT_CONTAINER_HEIGHT: u32 = 400;

/// Tuning knobs for the whole performance layer.
///
/// Hosts typically build one value at startup (possibly deserialized from their own config file
/// with `feature = "serde"`), call [`validate`](Self::validate) once, and hand it to the
/// constructors that accept options. Missing fields deserialize to the defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LazyViewOptions {
    /// Maximum number of entries kept by a cache built from these options. `0` disables caching.
    pub cache_capacity: usize,

    /// Extra items realized past the visible ones.
    pub overscan: usize,

    /// Uniform item height in the scroll axis.
    pub item_height: u32,

    /// Height of the scroll container.
    pub container_height: u32,

    pub debounce_ms: u64,

    pub throttle_ms: u64,

    /// Intersection ratio in `[0, 1]` at which deferred content starts loading.
    pub visibility_threshold: f32,
}

impl LazyViewOptions {
    pub fn new() -> Self {
        Self {
            cache_capacity: cache::DEFAULT_CAPACITY,
            overscan: window::DEFAULT_OVERSCAN,
            item_height: DEFAULT_ITEM_HEIGHT,
            container_height: DEFAULT_CONTAINER_HEIGHT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            throttle_ms: DEFAULT_THROTTLE_MS,
            visibility_threshold: visibility::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_item_height(mut self, item_height: u32) -> Self {
        self.item_height = item_height;
        self
    }

    pub fn with_container_height(mut self, container_height: u32) -> Self {
        self.container_height = container_height;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    pub fn with_visibility_threshold(mut self, visibility_threshold: f32) -> Self {
        self.visibility_threshold = visibility_threshold;
        self
    }

    /// Checks every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.item_height == 0 {
            return Err(ConfigError::ZeroItemHeight);
        }
        if self.container_height == 0 {
            return Err(ConfigError::ZeroContainerHeight);
        }
        if self.debounce_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if self.throttle_ms == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        check_threshold(self.visibility_threshold)?;
        Ok(())
    }
}

impl Default for LazyViewOptions {
    fn default() -> Self {
        Self::new()
    }
}
