use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::LazyViewOptions;
use crate::key::SlotMap;

/// Capacity used by [`BoundedCache::with_default_capacity`].
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Clone, Debug)]
struct Slot<V> {
    value: V,
    insertion_seq: u64,
}

/// A fixed-capacity string-keyed cache with insertion-order eviction.
///
/// This is deliberately *not* an LRU: reads never refresh an entry, and overwriting an existing
/// key keeps its original insertion position. When a new key is written to a full cache, the
/// entry inserted longest ago is evicted.
///
/// A capacity of `0` is valid and turns the cache into a no-op: every written entry is evicted
/// by the same `set` call.
#[derive(Clone, Debug)]
pub struct BoundedCache<V> {
    capacity: usize,
    slots: SlotMap<Slot<V>>,
    // insertion_seq -> key, oldest first
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl<V> BoundedCache<V> {
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        ldebug!(capacity, "BoundedCache::new");
        Self {
            capacity,
            slots: SlotMap::default(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    pub fn from_options(options: &LazyViewOptions) -> Self {
        Self::new(options.cache_capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Looks up `key` without affecting eviction order.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.slots.get(key).map(|slot| &slot.value)
    }

    pub fn has(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Writes `value` under `key`. Overwriting an existing key keeps its insertion position.
    ///
    /// Returns the entry evicted to make room, if any. With capacity `0` that is the entry that
    /// was just written.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<(String, V)> {
        let key = key.into();
        if let Some(slot) = self.slots.get_mut(&key) {
            slot.value = value;
            return None;
        }

        let insertion_seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.order.insert(insertion_seq, key.clone());
        self.slots.insert(
            key,
            Slot {
                value,
                insertion_seq,
            },
        );

        if self.slots.len() > self.capacity {
            return self.evict_oldest();
        }
        None
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let slot = self.slots.remove(key)?;
        self.order.remove(&slot.insertion_seq);
        Some(slot.value)
    }

    pub fn clear(&mut self) {
        ltrace!(len = self.slots.len(), "BoundedCache::clear");
        self.slots.clear();
        self.order.clear();
    }

    /// Keys from the oldest insertion to the newest.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.values().map(String::as_str)
    }

    /// Entries from the oldest insertion to the newest.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &V)> {
        self.order.values().filter_map(|key| {
            self.slots
                .get(key.as_str())
                .map(|slot| (key.as_str(), &slot.value))
        })
    }

    fn evict_oldest(&mut self) -> Option<(String, V)> {
        let (_, key) = self.order.pop_first()?;
        let slot = self.slots.remove(key.as_str())?;
        ltrace!(key = key.as_str(), "BoundedCache: evicted oldest entry");
        Some((key, slot.value))
    }
}

impl<V> Default for BoundedCache<V> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
