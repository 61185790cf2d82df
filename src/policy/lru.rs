//! LRU (Least Recently Used) cache replacement policy.
//!
//! Evicts the entry whose last touch is oldest. Both a successful `get` and
//! any `insert` of a key count as a touch, so reads change future eviction
//! choices here, unlike FIFO and LIFO.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        LruCache<K, V> Layout                        │
//! │                                                                     │
//! │  index: FxHashMap<K, SlotId>     order: IntrusiveList<Entry<K, V>>  │
//! │  ┌─────────┬────────┐            ┌────────────────────────────┐     │
//! │  │   Key   │ SlotId │            │ head (LRU)     tail (MRU)  │     │
//! │  ├─────────┼────────┤            ├────────────────────────────┤     │
//! │  │   "A"   │  id_0  │───────────►│  [B]   [C]   [D]   [A]     │     │
//! │  │   "B"   │  id_1  │            │   ↑                 ↑      │     │
//! │  │   "C"   │  id_2  │            │ EVICT           get(A)     │     │
//! │  │   "D"   │  id_3  │            └────────────────────────────┘     │
//! │  └─────────┴────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation | Time | Notes                                       |
//! |-----------|------|---------------------------------------------|
//! | `get`     | O(1) | Hit moves the entry to the tail             |
//! | `peek`    | O(1) | No reordering                               |
//! | `insert`  | O(1) | New: pop head if full. Existing: to tail    |
//! | `clear`   | O(n) |                                             |
//!
//! ## Example
//!
//! ```
//! use policy_cache::policy::lru::LruCache;
//! use policy_cache::traits::BoundedStore;
//!
//! let mut cache = LruCache::default();
//! for key in ["A", "B", "C", "D"] {
//!     cache.insert(key, key.to_lowercase());
//! }
//! cache.get(&"A");
//!
//! assert_eq!(cache.insert("E", "e".into()), Some("B"));
//! assert_eq!(cache.peek_lru().map(|(k, _)| *k), Some("C"));
//! ```

use std::fmt::{self, Debug};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::discard::{DiscardListener, Discarder};
use crate::ds::{IntrusiveList, SlotId};
use crate::error::{InvariantError, ensure};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot, MetricsSnapshotProvider};
use crate::traits::{BoundedStore, MAX_ITEMS};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Bounded cache that evicts the least recently touched entry.
pub struct LruCache<K, V> {
    index: FxHashMap<K, SlotId>,
    order: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    discarder: Discarder<K>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: IntrusiveList::with_capacity(capacity),
            capacity,
            discarder: Discarder::new("lru"),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    pub fn with_listener(mut self, listener: impl DiscardListener<K> + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl DiscardListener<K> + 'static) {
        self.discarder.set_listener(Box::new(listener));
    }

    /// Least recently touched entry, without touching it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.front().map(|entry| (&entry.key, &entry.value))
    }

    /// Most recently touched entry, without touching it.
    pub fn peek_mru(&self) -> Option<(&K, &V)> {
        self.order.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Marks `key` as most recently used without reading it.
    ///
    /// Returns `false` if the key is not cached.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.order.move_to_back(id),
            None => false,
        }
    }

    fn evict_lru(&mut self) -> Option<K> {
        let entry = self.order.pop_front()?;
        self.index.remove(&entry.key);
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        Some(self.discarder.notify(entry.key))
    }

    /// Checks index/list agreement and the capacity bound.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.order.check_invariants()?;
        ensure(self.index.len() == self.order.len(), || {
            format!(
                "index holds {} keys but order holds {}",
                self.index.len(),
                self.order.len()
            )
        })?;
        ensure(self.index.len() <= self.capacity, || {
            format!("{} entries exceed capacity {}", self.index.len(), self.capacity)
        })?;
        for (id, entry) in self.order.iter_entries() {
            ensure(self.index.get(&entry.key) == Some(&id), || {
                format!("key {:?} is not indexed at its slot", entry.key)
            })?;
        }
        Ok(())
    }
}

impl<K, V> BoundedStore<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V) -> Option<K> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
            }
            self.order.move_to_back(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return None;
        }

        if self.capacity == 0 {
            #[cfg(feature = "metrics")]
            self.metrics.record_rejected_insert();
            tracing::debug!(policy = "lru", "zero capacity, insert dropped");
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let evicted = if self.index.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let id = self.order.push_back(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        debug_assert!(self.check_invariants().is_ok());
        evicted
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();
        self.order.move_to_back(id);
        self.order.get(id).map(|entry| &entry.value)
    }

    fn lookup(&mut self, key: Option<&K>) -> Option<&V> {
        match key {
            Some(key) => self.get(key),
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.order.get(id).map(|entry| &entry.value)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    /// Least recently touched first.
    fn entries(&self) -> Vec<(&K, &V)> {
        self.order
            .iter()
            .map(|entry| (&entry.key, &entry.value))
            .collect()
    }

    fn policy_name(&self) -> &'static str {
        "lru"
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new(MAX_ITEMS)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider for LruCache<K, V> {
    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.capacity)
    }
}

impl<K, V> Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("discarder", &self.discarder)
            .finish_non_exhaustive()
    }
}
