//! Windowed ("virtualized") rendering math for uniform-height lists.
//!
//! Only the contiguous slice of items intersecting the viewport (plus a trailing overscan) is
//! materialized. Each realized item is placed absolutely at `index * item_height` inside a
//! container that reports the full [`total_extent`].

use alloc::vec::Vec;
use core::cmp;

use crate::{ConfigError, LazyViewOptions, Viewport, VisibleRange, WindowItem};

/// Default number of extra items realized past the visible ones.
pub const DEFAULT_OVERSCAN: usize = 1;

/// Computes the index range that must be materialized for `viewport`.
///
/// `start = floor(scroll_offset / item_height)` clamped to `item_count`, and
/// `end = min(start + ceil(container_height / item_height) + overscan, item_count)`. Scroll
/// offsets past the end of the list (e.g. after it shrank) produce an empty range at
/// `item_count`, never an out-of-bounds one.
pub fn compute_visible_range(viewport: Viewport, overscan: usize) -> VisibleRange {
    let count = viewport.item_count();
    if count == 0 {
        return VisibleRange::EMPTY;
    }

    let item_height = viewport.item_height();
    let first = viewport.scroll_offset() / item_height as u64;
    let start_index = usize::try_from(first).unwrap_or(usize::MAX).min(count);
    let visible_count = viewport.container_height().div_ceil(item_height) as usize;
    let end_index = cmp::min(
        start_index
            .saturating_add(visible_count)
            .saturating_add(overscan),
        count,
    );

    ltrace!(
        scroll_offset = viewport.scroll_offset(),
        start_index,
        end_index,
        "compute_visible_range"
    );
    VisibleRange {
        start_index,
        end_index,
    }
}

/// Full scrollable height of `item_count` items of `item_height` each.
pub fn total_extent(item_count: usize, item_height: u32) -> u64 {
    (item_count as u64).saturating_mul(item_height as u64)
}

/// A validated windowing configuration for one list.
///
/// It holds no data and no scroll state: every query takes the current scroll offset and item
/// count, so the backing sequence can change freely between calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowedList {
    item_height: u32,
    container_height: u32,
    overscan: usize,
}

impl WindowedList {
    pub fn new(item_height: u32, container_height: u32) -> Result<Self, ConfigError> {
        // Validate through the viewport constructor so both checks live in one place.
        Viewport::new(0, container_height, item_height, 0)?;
        Ok(Self {
            item_height,
            container_height,
            overscan: DEFAULT_OVERSCAN,
        })
    }

    pub fn from_options(options: &LazyViewOptions) -> Result<Self, ConfigError> {
        let list = Self::new(options.item_height, options.container_height)?;
        Ok(list.with_overscan(options.overscan))
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn container_height(&self) -> u32 {
        self.container_height
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Applies a container resize reported by the UI layer.
    pub fn set_container_height(&mut self, container_height: u32) -> Result<(), ConfigError> {
        if container_height == 0 {
            return Err(ConfigError::ZeroContainerHeight);
        }
        self.container_height = container_height;
        Ok(())
    }

    pub fn viewport(&self, scroll_offset: u64, item_count: usize) -> Viewport {
        Viewport::from_validated(
            scroll_offset,
            self.container_height,
            self.item_height,
            item_count,
        )
    }

    pub fn range(&self, scroll_offset: u64, item_count: usize) -> VisibleRange {
        compute_visible_range(self.viewport(scroll_offset, item_count), self.overscan)
    }

    pub fn total_extent(&self, item_count: usize) -> u64 {
        total_extent(item_count, self.item_height)
    }

    pub fn max_scroll_offset(&self, item_count: usize) -> u64 {
        self.total_extent(item_count)
            .saturating_sub(self.container_height as u64)
    }

    pub fn clamp_scroll_offset(&self, scroll_offset: u64, item_count: usize) -> u64 {
        scroll_offset.min(self.max_scroll_offset(item_count))
    }

    /// Returns the index of the item covering `offset`, if any.
    pub fn index_at_offset(&self, offset: u64, item_count: usize) -> Option<usize> {
        let index = usize::try_from(offset / self.item_height as u64).ok()?;
        (index < item_count).then_some(index)
    }

    pub fn item(&self, index: usize) -> WindowItem {
        WindowItem {
            index,
            offset: (index as u64).saturating_mul(self.item_height as u64),
            height: self.item_height,
        }
    }

    /// Calls `f` for every realized item, in ascending index order, without allocating.
    pub fn for_each_item(
        &self,
        scroll_offset: u64,
        item_count: usize,
        mut f: impl FnMut(WindowItem),
    ) {
        for index in self.range(scroll_offset, item_count).indices() {
            f(self.item(index));
        }
    }

    pub fn items(&self, scroll_offset: u64, item_count: usize) -> Vec<WindowItem> {
        let mut out = Vec::with_capacity(self.range(scroll_offset, item_count).len());
        self.for_each_item(scroll_offset, item_count, |it| out.push(it));
        out
    }

    /// Pairs each realized slot with its element of `data`.
    pub fn slice<'a, T>(
        &self,
        scroll_offset: u64,
        data: &'a [T],
    ) -> impl Iterator<Item = (WindowItem, &'a T)> + use<'a, T> {
        let range = self.range(scroll_offset, data.len());
        let list = *self;
        data[range.indices()]
            .iter()
            .enumerate()
            .map(move |(i, value)| (list.item(range.start_index + i), value))
    }
}
