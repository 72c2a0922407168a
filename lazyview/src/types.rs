use crate::ConfigError;

/// Scroll geometry of a uniform-height list, as reported by the UI layer.
///
/// Built through [`Viewport::new`], which rejects zero heights. Recomputed on every scroll or
/// resize event; nothing here is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    scroll_offset: u64,
    container_height: u32,
    item_height: u32,
    item_count: usize,
}

impl Viewport {
    pub fn new(
        scroll_offset: u64,
        container_height: u32,
        item_height: u32,
        item_count: usize,
    ) -> Result<Self, ConfigError> {
        if item_height == 0 {
            return Err(ConfigError::ZeroItemHeight);
        }
        if container_height == 0 {
            return Err(ConfigError::ZeroContainerHeight);
        }
        Ok(Self {
            scroll_offset,
            container_height,
            item_height,
            item_count,
        })
    }

    /// Callers must have validated both heights already.
    pub(crate) fn from_validated(
        scroll_offset: u64,
        container_height: u32,
        item_height: u32,
        item_count: usize,
    ) -> Self {
        debug_assert!(item_height > 0 && container_height > 0);
        Self {
            scroll_offset,
            container_height,
            item_height,
            item_count,
        }
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn container_height(&self) -> u32 {
        self.container_height
    }

    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Returns a copy scrolled to `scroll_offset`.
    pub fn with_scroll_offset(mut self, scroll_offset: u64) -> Self {
        self.scroll_offset = scroll_offset;
        self
    }

    /// Returns a copy describing a list of `item_count` items.
    pub fn with_item_count(mut self, item_count: usize) -> Self {
        self.item_count = item_count;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl VisibleRange {
    pub const EMPTY: Self = Self {
        start_index: 0,
        end_index: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..self.end_index).contains(&index)
    }

    pub fn indices(&self) -> core::ops::Range<usize> {
        self.start_index..self.end_index
    }
}

/// A realized slot: where item `index` must be placed inside the full-height container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowItem {
    pub index: usize,
    /// Absolute offset from the top of the scroll container (`index * item_height`).
    pub offset: u64,
    pub height: u32,
}

impl WindowItem {
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.height as u64)
    }
}
