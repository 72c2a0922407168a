//! A headless rendering and caching performance layer for UI code.
//!
//! For adapter-level utilities (cached fetch coordination, scroll-driven list control, deferred
//! images), see the `lazyview-adapter` crate.
//!
//! This crate holds the synchronous, UI-agnostic pieces:
//! - [`BoundedCache`]: a fixed-capacity cache with insertion-order eviction
//! - [`RequestDescriptor`] / [`cache_key`]: a stable key policy for cached requests
//! - [`compute_visible_range`] / [`WindowedList`]: windowing math for uniform-height lists
//! - [`Debounce`] / [`Throttle`]: adapter-driven rate limiting
//! - [`VisibilitySubscription`] / [`VisibilityObserver`]: one-shot visibility for lazy loading
//!
//! Nothing here owns a clock, a timer or a UI object. A TUI/GUI layer is expected to provide
//! scroll offsets, viewport geometry, intersection ratios and `now_ms` timestamps.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod error;
mod key;
mod options;
mod request;
mod state;
mod timing;
mod types;
mod visibility;
mod window;


pub use cache::{BoundedCache, DEFAULT_CAPACITY};
pub use error::ConfigError;
pub use options::{
    DEFAULT_CONTAINER_HEIGHT, DEFAULT_DEBOUNCE_MS, DEFAULT_ITEM_HEIGHT, DEFAULT_THROTTLE_MS,
    LazyViewOptions,
};
pub use request::{RequestDescriptor, cache_key};
pub use state::{FetchState, FetchStatus};
pub use timing::{Debounce, Throttle};
pub use types::{Viewport, VisibleRange, WindowItem};
pub use visibility::{
    DEFAULT_THRESHOLD, VisibilityObserver, VisibilitySubscription, observe_visibility,
};
pub use window::{DEFAULT_OVERSCAN, WindowedList, compute_visible_range, total_extent};
