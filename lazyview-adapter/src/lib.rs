//! Adapter utilities for the `lazyview` crate.
//!
//! The `lazyview` crate is UI-agnostic and focuses on the core math and state. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - Cache-backed fetch coordination with a `{status, data, error}` view
//! - A scroll-driven list controller (throttled scroll events → windowed range)
//! - Deferred images that only expose their source once visible
//!
//! This crate is intentionally framework-agnostic (no DOM/egui/ratatui bindings) and
//! runtime-agnostic: fetch futures are plain `core::future::Future`s for any local executor.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod deferred;
mod fetch;

#[cfg(test)]
mod tests;

pub use controller::ListController;
pub use deferred::{DeferredImage, ImageLoadState};
pub use fetch::{
    FetchCoordinator, SharedCache, Subscription, shared_cache, shared_cache_from_options,
};
