//! LFU (Least Frequently Used) cache replacement policy.
//!
//! Evicts the entry with the lowest access count. Among entries sharing the
//! lowest count, the one that reached that count first is evicted.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                          LfuCache<K, V> Layout                        │
//! │                                                                       │
//! │  cache_data: FxHashMap<K, Node<V>>        freq_map: FrequencyGroups<K>│
//! │  ┌─────┬─────────────────────────┐        ┌──────┬────────────────┐   │
//! │  │ Key │ Node                    │        │ freq │ group (FIFO)   │   │
//! │  ├─────┼─────────────────────────┤        ├──────┼────────────────┤   │
//! │  │ "A" │ value, frequency=3, id  │        │  1   │ [C] [D]        │   │
//! │  │ "B" │ value, frequency=2, id  │        │  2   │ [B]            │   │
//! │  │ "C" │ value, frequency=1, id  │        │  3   │ [A]            │   │
//! │  │ "D" │ value, frequency=1, id  │        └──────┴────────────────┘   │
//! │  └─────┴─────────────────────────┘        min_freq = 1 ─► victim C    │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frequency bump (`get` hit, or `insert` of a present key)
//!
//! ```text
//!   f = node.frequency
//!   unlink key from group f
//!   if group f is now empty: drop it; if f == min_freq { min_freq += 1 }
//!   append key to group f + 1; node.frequency = f + 1
//! ```
//!
//! ## Insert of a new key
//!
//! ```text
//!   if full: pop oldest key of group min_freq, drop its node, report discard
//!   append key to group 1; min_freq = 1
//! ```
//!
//! `min_freq` is never found by scanning. It only ever moves up by one during
//! a bump, and back to 1 on insertion.
//!
//! ## Operations
//!
//! | Operation        | Time | Notes                                   |
//! |------------------|------|-----------------------------------------|
//! | `get`            | O(1) | Bumps frequency on hit                  |
//! | `peek`           | O(1) | No bump                                 |
//! | `insert` (new)   | O(1) | May evict the head of the min group     |
//! | `insert` (update)| O(1) | Replaces the value and bumps frequency  |
//! | `peek_lfu`       | O(1) |                                         |
//! | `entries`        | O(n + g log g) | Diagnostic                    |
//!
//! Frequencies saturate at `u64::MAX`.
//!
//! ## Example
//!
//! ```
//! use policy_cache::policy::lfu::LfuCache;
//! use policy_cache::traits::{BoundedStore, LfuStore};
//!
//! let mut cache = LfuCache::default();
//! for key in ["A", "B", "C", "D"] {
//!     cache.insert(key, 0);
//! }
//! cache.get(&"A");
//! cache.get(&"A");
//! cache.get(&"B");
//!
//! assert_eq!(cache.frequency(&"A"), Some(3));
//! assert_eq!(cache.insert("E", 0), Some("C"));
//! assert_eq!(cache.min_frequency(), Some(1));
//! ```

use std::fmt::{self, Debug};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::discard::{DiscardListener, Discarder};
use crate::ds::{FrequencyGroups, SlotId};
use crate::error::{InvariantError, ensure};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetrics, CacheMetricsSnapshot, MetricsSnapshotProvider};
use crate::traits::{BoundedStore, LfuStore, MAX_ITEMS};

#[derive(Debug)]
struct Node<V> {
    value: V,
    frequency: u64,
    slot: SlotId,
}

/// Bounded cache that evicts the least frequently used entry in O(1).
pub struct LfuCache<K, V> {
    cache_data: FxHashMap<K, Node<V>>,
    freq_map: FrequencyGroups<K>,
    capacity: usize,
    discarder: Discarder<K>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache_data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            freq_map: FrequencyGroups::with_capacity(capacity),
            capacity,
            discarder: Discarder::new("lfu"),
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

    /// Number of distinct frequencies currently held.
    pub fn frequency_levels(&self) -> usize {
        self.freq_map.group_count()
    }

    /// Keys at `frequency`, in the order they would be evicted.
    pub fn keys_at(&self, frequency: u64) -> Vec<&K> {
        self.freq_map.group(frequency).collect()
    }

    fn evict_min(&mut self) -> Option<K> {
        let key = self.freq_map.pop_min()?;
        self.cache_data.remove(&key);
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        Some(self.discarder.notify(key))
    }

    /// Checks that every key sits in exactly the group of its recorded
    /// frequency, and that `min_freq` names the lowest group.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.freq_map.check_invariants()?;
        ensure(self.cache_data.len() == self.freq_map.len(), || {
            format!(
                "{} nodes but {} grouped keys",
                self.cache_data.len(),
                self.freq_map.len()
            )
        })?;
        ensure(self.cache_data.len() <= self.capacity, || {
            format!(
                "{} entries exceed capacity {}",
                self.cache_data.len(),
                self.capacity
            )
        })?;
        for (key, node) in &self.cache_data {
            ensure(self.freq_map.key(node.slot) == Some(key), || {
                format!("node for {:?} points at another key's slot", key)
            })?;
        }
        for (key, frequency) in self.freq_map.iter() {
            let recorded = self.cache_data.get(key).map(|node| node.frequency);
            ensure(recorded == Some(frequency), || {
                format!(
                    "{:?} is grouped at {} but records {:?}",
                    key, frequency, recorded
                )
            })?;
        }
        Ok(())
    }
}

impl<K, V> BoundedStore<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V) -> Option<K> {
        if let Some(node) = self.cache_data.get_mut(&key) {
            node.value = value;
            if let Some(frequency) = self.freq_map.promote(node.slot) {
                node.frequency = frequency;
            }
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            debug_assert!(self.check_invariants().is_ok());
            return None;
        }

        if self.capacity == 0 {
            #[cfg(feature = "metrics")]
            self.metrics.record_rejected_insert();
            tracing::debug!(policy = "lfu", "zero capacity, insert dropped");
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let evicted = if self.cache_data.len() >= self.capacity {
            self.evict_min()
        } else {
            None
        };

        let slot = self.freq_map.insert(key.clone());
        self.cache_data.insert(
            key,
            Node {
                value,
                frequency: 1,
                slot,
            },
        );

        debug_assert!(self.check_invariants().is_ok());
        evicted
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let Some(node) = self.cache_data.get_mut(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };
        if let Some(frequency) = self.freq_map.promote(node.slot) {
            node.frequency = frequency;
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();
        Some(&node.value)
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
        self.cache_data.get(key).map(|node| &node.value)
    }

    fn len(&self) -> usize {
        self.cache_data.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.cache_data.clear();
        self.freq_map.clear();
    }

    /// Ascending frequency, oldest first within a frequency.
    fn entries(&self) -> Vec<(&K, &V)> {
        self.freq_map
            .iter()
            .filter_map(|(key, _)| {
                self.cache_data
                    .get_key_value(key)
                    .map(|(key, node)| (key, &node.value))
            })
            .collect()
    }

    fn policy_name(&self) -> &'static str {
        "lfu"
    }
}

impl<K, V> LfuStore<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn frequency(&self, key: &K) -> Option<u64> {
        self.cache_data.get(key).map(|node| node.frequency)
    }

    fn min_frequency(&self) -> Option<u64> {
        self.freq_map.min_freq()
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        let key = self.freq_map.peek_min()?;
        self.cache_data
            .get_key_value(key)
            .map(|(key, node)| (key, &node.value))
    }
}

impl<K, V> Default for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new(MAX_ITEMS)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider for LfuCache<K, V> {
    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.cache_data.len(), self.capacity)
    }
}

impl<K, V> Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("capacity", &self.capacity)
            .field("len", &self.cache_data.len())
            .field("min_freq", &self.freq_map.min_freq())
            .field("discarder", &self.discarder)
            .finish_non_exhaustive()
    }
}
