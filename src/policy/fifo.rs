//! FIFO (First In, First Out) cache replacement policy.
//!
//! Evicts the entry that has been present the longest, regardless of how often
//! or how recently it was read.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       FifoCache<K, V> Layout                        │
//! │                                                                     │
//! │  map: FxHashMap<K, V>              order: VecDeque<K>               │
//! │  ┌─────────┬───────┐               ┌──────────────────────────┐     │
//! │  │   Key   │ Value │               │ front              back  │     │
//! │  ├─────────┼───────┤               ├──────────────────────────┤     │
//! │  │   "A"   │  v1   │               │  [A]  [B]  [C]  [D]      │     │
//! │  │   "B"   │  v2   │               │   ↑               ↑      │     │
//! │  │   "C"   │  v3   │               │ EVICT          newest    │     │
//! │  │   "D"   │  v4   │               └──────────────────────────┘     │
//! │  └─────────┴───────┘                                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation | Time | Notes                                        |
//! |-----------|------|----------------------------------------------|
//! | `get`     | O(1) | No reordering                                |
//! | `insert`  | O(1) | Update in place, or evict front + push back  |
//! | `clear`   | O(n) |                                              |
//!
//! Re-inserting an existing key only replaces its value; the key keeps its
//! original place in the queue. There is no arbitrary removal, so the queue
//! never holds stale keys.
//!
//! ## Example
//!
//! ```
//! use policy_cache::policy::fifo::FifoCache;
//! use policy_cache::traits::BoundedStore;
//!
//! let mut cache = FifoCache::default();
//! for (i, key) in ["A", "B", "C", "D"].into_iter().enumerate() {
//!     cache.insert(key, i);
//! }
//! cache.get(&"A");
//! cache.insert("A", 10);
//!
//! // A is still the oldest insertion.
//! assert_eq!(cache.insert("E", 4), Some("A"));
//! assert!(!cache.contains(&"A"));
//! ```

use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::discard::{DiscardListener, Discarder};
use crate::error::{InvariantError, ensure};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot, MetricsSnapshotProvider};
use crate::traits::{BoundedStore, MAX_ITEMS};

/// Bounded cache that evicts the oldest insertion.
pub struct FifoCache<K, V> {
    map: FxHashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
    discarder: Discarder<K>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is accepted; such a cache stores nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: VecDeque::with_capacity(capacity),
            capacity,
            discarder: Discarder::new("fifo"),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    /// Installs `listener` and returns the cache.
    pub fn with_listener(mut self, listener: impl DiscardListener<K> + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    /// Installs `listener`, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl DiscardListener<K> + 'static) {
        self.discarder.set_listener(Box::new(listener));
    }

    /// The key the next overflow would evict.
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        let key = self.order.front()?;
        self.map.get(key).map(|value| (key, value))
    }

    fn evict_oldest(&mut self) -> Option<K> {
        let key = self.order.pop_front()?;
        self.map.remove(&key);
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        Some(self.discarder.notify(key))
    }

    /// Checks that the queue and the map hold the same keys exactly once.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        ensure(self.map.len() == self.order.len(), || {
            format!(
                "map holds {} keys but queue holds {}",
                self.map.len(),
                self.order.len()
            )
        })?;
        ensure(self.map.len() <= self.capacity, || {
            format!("{} entries exceed capacity {}", self.map.len(), self.capacity)
        })?;
        for key in &self.order {
            ensure(self.map.contains_key(key), || {
                format!("queued key {:?} is missing from the map", key)
            })?;
        }
        Ok(())
    }
}

impl<K, V> BoundedStore<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V) -> Option<K> {
        if let Some(slot) = self.map.get_mut(&key) {
            *slot = value;
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return None;
        }

        if self.capacity == 0 {
            #[cfg(feature = "metrics")]
            self.metrics.record_rejected_insert();
            tracing::debug!(policy = "fifo", "zero capacity, insert dropped");
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let evicted = if self.map.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.map.insert(key, value);

        debug_assert!(self.check_invariants().is_ok());
        evicted
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let value = self.map.get(key);
        #[cfg(feature = "metrics")]
        if value.is_some() {
            self.metrics.record_get_hit();
        } else {
            self.metrics.record_get_miss();
        }
        value
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
        self.map.get(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.order
            .iter()
            .filter_map(|key| self.map.get(key).map(|value| (key, value)))
            .collect()
    }

    fn policy_name(&self) -> &'static str {
        "fifo"
    }
}

impl<K, V> Default for FifoCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new(MAX_ITEMS)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider for FifoCache<K, V> {
    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.map.len(), self.capacity)
    }
}

impl<K, V> Debug for FifoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache")
            .field("capacity", &self.capacity)
            .field("len", &self.map.len())
            .field("discarder", &self.discarder)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discard::DiscardLog;

    fn filled(log: &DiscardLog<&'static str>) -> FifoCache<&'static str, &'static str> {
        let mut cache = FifoCache::default().with_listener(log.clone());
        cache.insert("A", "Hello");
        cache.insert("B", "World");
        cache.insert("C", "Holberton");
        cache.insert("D", "School");
        cache
    }

    mod basic_behavior {
        use super::*;

        #[test]
        fn new_cache_is_empty() {
            let cache: FifoCache<u32, u32> = FifoCache::new(3);
            assert!(cache.is_empty());
            assert!(!cache.is_full());
            assert_eq!(cache.capacity(), 3);
            assert_eq!(cache.policy_name(), "fifo");
        }

        #[test]
        fn default_uses_max_items() {
            let cache: FifoCache<u32, u32> = FifoCache::default();
            assert_eq!(cache.capacity(), MAX_ITEMS);
        }

        #[test]
        fn update_keeps_size_and_position() {
            let log = DiscardLog::new();
            let mut cache = filled(&log);
            assert_eq!(cache.insert("B", "Updated"), None);
            assert_eq!(cache.len(), 4);
            assert_eq!(cache.peek(&"B"), Some(&"Updated"));
            assert_eq!(cache.peek_oldest(), Some((&"A", &"Hello")));
            assert!(log.is_empty());
        }

        #[test]
        fn absent_inputs_are_ignored() {
            let log = DiscardLog::new();
            let mut cache = filled(&log);
            assert_eq!(cache.put(None, Some("x")), None);
            assert_eq!(cache.put(Some("E"), None), None);
            assert_eq!(cache.lookup(None), None);
            assert_eq!(cache.len(), 4);
            assert!(log.is_empty());
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn evicts_oldest_insertion() {
            let log = DiscardLog::new();
            let mut cache = filled(&log);
            assert!(cache.is_full());

            assert_eq!(cache.insert("E", "Battery"), Some("A"));
            assert_eq!(log.lines(), vec!["DISCARD: A"]);
            assert_eq!(cache.len(), 4);

            let order: Vec<_> = cache.entries().into_iter().map(|(k, _)| *k).collect();
            assert_eq!(order, vec!["B", "C", "D", "E"]);
        }

        #[test]
        fn reads_do_not_protect_entries() {
            let log = DiscardLog::new();
            let mut cache = filled(&log);
            for _ in 0..5 {
                assert_eq!(cache.get(&"A"), Some(&"Hello"));
            }
            cache.insert("E", "Battery");
            cache.insert("F", "Mission");
            assert_eq!(log.keys(), vec!["A", "B"]);
        }

        #[test]
        fn zero_capacity_stores_nothing() {
            let mut cache = FifoCache::new(0);
            assert_eq!(cache.insert(1, 1), None);
            assert!(cache.is_empty());
            assert!(cache.is_full());
        }

        #[test]
        fn clear_reports_no_discards() {
            let log = DiscardLog::new();
            let mut cache = filled(&log);
            cache.clear();
            assert!(cache.is_empty());
            assert!(log.is_empty());
            cache.check_invariants().unwrap();
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn counts_hits_updates_and_evictions() {
            let mut cache = FifoCache::new(2);
            cache.insert(1, 'a');
            cache.insert(1, 'b');
            cache.insert(2, 'c');
            cache.insert(3, 'd');
            cache.get(&2);
            cache.get(&1);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.insert_new, 3);
            assert_eq!(snap.insert_updates, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.cache_len, 2);
        }

        #[test]
        fn absent_key_lookup_counts_as_miss() {
            let mut cache = FifoCache::new(2);
            cache.insert(1, 'a');
            assert_eq!(cache.lookup(None), None);
            assert_eq!(cache.lookup(Some(&1)), Some(&'a'));

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.get_calls, 2);
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
        }
    }
}
