use alloc::vec::Vec;

use lazyview::{ConfigError, LazyViewOptions, Throttle, VisibleRange, WindowItem, WindowedList};

/// A framework-neutral controller for one windowed list.
///
/// Raw scroll events are throttled before they move the window, so a burst of wheel/drag events
/// recomputes the realized range at most once per throttle window, always with the latest
/// offset. This type does not hold any UI objects. Adapters drive it by calling:
/// - `on_scroll` / `on_resize` / `set_item_count` when UI events occur
/// - `tick(now_ms)` each frame/timer tick, to flush a trailing scroll update
///
/// Then they materialize `items()` at their offsets inside a container of `total_extent()`.
#[derive(Clone, Debug)]
pub struct ListController {
    list: WindowedList,
    item_count: usize,
    scroll: Throttle<u64>,
}

impl ListController {
    pub fn new(
        list: WindowedList,
        item_count: usize,
        throttle_ms: u64,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            list,
            item_count,
            scroll: Throttle::new(0, throttle_ms, now_ms)?,
        })
    }

    pub fn from_options(
        options: &LazyViewOptions,
        item_count: usize,
        now_ms: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            WindowedList::from_options(options)?,
            item_count,
            options.throttle_ms,
            now_ms,
        )
    }

    pub fn list(&self) -> &WindowedList {
        &self.list
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// The scroll offset the window is currently computed for, clamped to the list.
    pub fn scroll_offset(&self) -> u64 {
        self.list.clamp_scroll_offset(*self.scroll.value(), self.item_count)
    }

    pub fn is_pending(&self) -> bool {
        self.scroll.is_pending()
    }

    /// When the host should call `tick` next, if a scroll update is parked.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.scroll.next_deadline_ms()
    }

    /// Call this when the UI reports a scroll offset change.
    ///
    /// Returns `true` if the window moved immediately; otherwise the offset is applied by a
    /// later `tick`.
    pub fn on_scroll(&mut self, scroll_offset: u64, now_ms: u64) -> bool {
        let offset = self.list.clamp_scroll_offset(scroll_offset, self.item_count);
        ltrace!(scroll_offset, offset, now_ms, "ListController::on_scroll");
        self.scroll.set(offset, now_ms)
    }

    pub fn on_resize(&mut self, container_height: u32) -> Result<(), ConfigError> {
        self.list.set_container_height(container_height)
    }

    /// Replaces the length of the backing sequence (e.g. after new data arrived).
    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
    }

    /// Flushes a parked scroll update whose throttle window has closed.
    ///
    /// Returns `true` when the window moved.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.scroll.tick(now_ms)
    }

    /// Drops a parked scroll update. Call on teardown.
    pub fn cancel(&mut self) {
        self.scroll.cancel();
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.list.range(self.scroll_offset(), self.item_count)
    }

    pub fn total_extent(&self) -> u64 {
        self.list.total_extent(self.item_count)
    }

    pub fn for_each_item(&self, f: impl FnMut(WindowItem)) {
        self.list.for_each_item(self.scroll_offset(), self.item_count, f);
    }

    pub fn items(&self) -> Vec<WindowItem> {
        self.list.items(self.scroll_offset(), self.item_count)
    }
}
