//! LIFO (Last In, First Out) cache replacement policy.
//!
//! Evicts the most recently inserted entry when a new key arrives at a full
//! cache. Re-inserting a present key counts as a fresh insertion: the key moves
//! to the top of the stack and becomes the next eviction candidate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       LifoCache<K, V> Layout                        │
//! │                                                                     │
//! │  index: FxHashMap<K, SlotId>     stack: IntrusiveList<Entry<K, V>>  │
//! │  ┌─────────┬────────┐            ┌────────────────────────────┐     │
//! │  │   Key   │ SlotId │            │ bottom                top  │     │
//! │  ├─────────┼────────┤            ├────────────────────────────┤     │
//! │  │   "A"   │  id_0  │───────────►│  [A]   [B]   [C]   [D]     │     │
//! │  │   "B"   │  id_1  │            │                     ↑      │     │
//! │  │   "C"   │  id_2  │            │                   EVICT    │     │
//! │  │   "D"   │  id_3  │            └────────────────────────────┘     │
//! │  └─────────┴────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stack is a linked list rather than a `Vec` so that a re-inserted key
//! can be lifted to the top in O(1).
//!
//! ## Operations
//!
//! | Operation | Time | Notes                                          |
//! |-----------|------|------------------------------------------------|
//! | `get`     | O(1) | No reordering                                  |
//! | `insert`  | O(1) | New: pop top if full, push. Existing: lift     |
//! | `clear`   | O(n) |                                                |
//!
//! ## Example
//!
//! ```
//! use policy_cache::policy::lifo::LifoCache;
//! use policy_cache::traits::BoundedStore;
//!
//! let mut cache = LifoCache::default();
//! for key in ["A", "B", "C", "D"] {
//!     cache.insert(key, ());
//! }
//! assert_eq!(cache.insert("E", ()), Some("D"));
//!
//! cache.insert("C", ());
//! assert_eq!(cache.insert("F", ()), Some("C"));
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

/// Bounded cache that evicts the newest insertion.
pub struct LifoCache<K, V> {
    index: FxHashMap<K, SlotId>,
    stack: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    discarder: Discarder<K>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LifoCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            stack: IntrusiveList::with_capacity(capacity),
            capacity,
            discarder: Discarder::new("lifo"),
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

    /// Entry on top of the stack, i.e. the next eviction candidate.
    pub fn peek_top(&self) -> Option<(&K, &V)> {
        self.stack.back().map(|entry| (&entry.key, &entry.value))
    }

    fn evict_top(&mut self) -> Option<K> {
        let entry = self.stack.pop_back()?;
        self.index.remove(&entry.key);
        #[cfg(feature = "metrics")]
        self.metrics.record_eviction();
        Some(self.discarder.notify(entry.key))
    }

    /// Checks that every indexed key points at a stack node holding that key.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.stack.check_invariants()?;
        ensure(self.index.len() == self.stack.len(), || {
            format!(
                "index holds {} keys but stack holds {}",
                self.index.len(),
                self.stack.len()
            )
        })?;
        ensure(self.index.len() <= self.capacity, || {
            format!("{} entries exceed capacity {}", self.index.len(), self.capacity)
        })?;
        for (key, &id) in &self.index {
            let entry = self.stack.get(id);
            ensure(entry.is_some_and(|entry| &entry.key == key), || {
                format!("key {:?} indexes a slot holding another key", key)
            })?;
        }
        Ok(())
    }
}

impl<K, V> BoundedStore<K, V> for LifoCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V) -> Option<K> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.stack.get_mut(id) {
                entry.value = value;
            }
            self.stack.move_to_back(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return None;
        }

        if self.capacity == 0 {
            #[cfg(feature = "metrics")]
            self.metrics.record_rejected_insert();
            tracing::debug!(policy = "lifo", "zero capacity, insert dropped");
            return None;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        let evicted = if self.index.len() >= self.capacity {
            self.evict_top()
        } else {
            None
        };

        let id = self.stack.push_back(Entry {
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
        self.stack.get(id).map(|entry| &entry.value)
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
        self.stack.get(id).map(|entry| &entry.value)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.stack.clear();
    }

    /// Top of the stack first.
    fn entries(&self) -> Vec<(&K, &V)> {
        let mut entries: Vec<_> = self
            .stack
            .iter()
            .map(|entry| (&entry.key, &entry.value))
            .collect();
        entries.reverse();
        entries
    }

    fn policy_name(&self) -> &'static str {
        "lifo"
    }
}

impl<K, V> Default for LifoCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new(MAX_ITEMS)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider for LifoCache<K, V> {
    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.capacity)
    }
}

impl<K, V> Debug for LifoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifoCache")
            .field("capacity", &self.capacity)
            .field("len", &self.index.len())
            .field("discarder", &self.discarder)
            .finish_non_exhaustive()
    }
}
