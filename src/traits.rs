//! # Bounded Store Trait Hierarchy
//!
//! Every eviction policy in this crate implements the same contract, so a
//! consumer can hold any of them behind `Box<dyn BoundedStore<K, V>>` and never
//! learn which rule picks the victim.
//!
//! ```text
//!                 ┌───────────────────────────────────────────┐
//!                 │           BoundedStore<K, V>              │
//!                 │                                           │
//!                 │  insert(&mut, K, V)        → Option<K>    │
//!                 │  put(&mut, Option<K>, Option<V>)          │
//!                 │  get(&mut, &K)             → Option<&V>   │
//!                 │  lookup(&mut, Option<&K>)  → Option<&V>   │
//!                 │  peek(&, &K) / contains(&, &K)            │
//!                 │  len / capacity / is_full / clear         │
//!                 │  entries(&) → eviction-priority dump      │
//!                 └─────────────────────┬─────────────────────┘
//!                                       │
//!          ┌──────────────┬─────────────┼──────────────┬──────────────┐
//!          ▼              ▼             ▼              ▼              │
//!     FifoCache       LifoCache      LruCache      LfuCache ──► LfuStore<K, V>
//!                                                                frequency(&K)
//!                                                                min_frequency()
//!                                                                peek_lfu()
//! ```
//!
//! ## Absent inputs
//!
//! [`put`](BoundedStore::put) and [`lookup`](BoundedStore::lookup) take
//! `Option` arguments: `None` is the absent key or value, and is answered with
//! a silent no-op or a miss. Nothing in this trait returns an error.
//!
//! ## Eviction Side Effects
//!
//! | Policy | Victim on overflow            | `get` reorders? | re-`put` reorders?   |
//! |--------|-------------------------------|-----------------|----------------------|
//! | FIFO   | oldest inserted               | no              | no                   |
//! | LIFO   | newest inserted               | no              | yes (becomes newest) |
//! | LRU    | least recently touched        | yes             | yes                  |
//! | LFU    | lowest frequency, oldest in it| bumps frequency | bumps frequency      |
//!
//! Every eviction is reported as a
//! [`DiscardEvent`](crate::discard::DiscardEvent) and returned from `insert`.

use std::fmt::Display;

/// Default capacity shared by every policy.
pub const MAX_ITEMS: usize = 4;

/// Shared contract of all bounded caches.
///
/// # Example
///
/// ```
/// use policy_cache::policy::fifo::FifoCache;
/// use policy_cache::policy::lru::LruCache;
/// use policy_cache::traits::BoundedStore;
///
/// fn fill(cache: &mut dyn BoundedStore<&'static str, u32>) -> Vec<&'static str> {
///     ["A", "B", "C", "D", "E"]
///         .into_iter()
///         .enumerate()
///         .filter_map(|(i, k)| cache.insert(k, i as u32))
///         .collect()
/// }
///
/// assert_eq!(fill(&mut FifoCache::<&str, u32>::default()), vec!["A"]);
/// assert_eq!(fill(&mut LruCache::<&str, u32>::default()), vec!["A"]);
/// ```
pub trait BoundedStore<K, V> {
    /// Inserts or updates `key`, returning the key discarded to make room.
    ///
    /// Updating a key that is already present never evicts. Inserting into a
    /// zero-capacity cache stores nothing.
    fn insert(&mut self, key: K, value: V) -> Option<K>;

    /// Nullable form of [`insert`](Self::insert).
    ///
    /// An absent key or value is ignored: size is unchanged and no discard is
    /// reported.
    ///
    /// ```
    /// use policy_cache::policy::lifo::LifoCache;
    /// use policy_cache::traits::BoundedStore;
    ///
    /// let mut cache: LifoCache<&str, &str> = LifoCache::default();
    /// cache.put(None, Some("orphan"));
    /// cache.put(Some("key"), None);
    /// assert!(cache.is_empty());
    /// ```
    fn put(&mut self, key: Option<K>, value: Option<V>) -> Option<K> {
        match (key, value) {
            (Some(key), Some(value)) => self.insert(key, value),
            _ => {
                tracing::trace!(
                    policy = self.policy_name(),
                    "ignoring put with absent key or value"
                );
                None
            },
        }
    }

    /// Returns the value for `key`, or `None` when it is not cached.
    ///
    /// LRU refreshes the key's recency and LFU bumps its frequency, so this
    /// can change which key is evicted next.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Nullable form of [`get`](Self::get); an absent key is a miss.
    ///
    /// The policies override this so that the absent-key miss also reaches
    /// their metrics.
    fn lookup(&mut self, key: Option<&K>) -> Option<&V> {
        match key {
            Some(key) => self.get(key),
            None => None,
        }
    }

    /// Reads a value without touching eviction state.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Checks membership without touching eviction state.
    fn contains(&self, key: &K) -> bool {
        self.peek(key).is_some()
    }

    /// Current number of entries.
    #[doc(alias = "size")]
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Returns `true` once `len() >= capacity()`.
    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Drops every entry. Teardown is not eviction: no discards are reported.
    fn clear(&mut self);

    /// Entries in eviction-priority order; the first element is the next victim.
    fn entries(&self) -> Vec<(&K, &V)>;

    /// Short lowercase policy name (`"fifo"`, `"lifo"`, `"lru"`, `"lfu"`).
    fn policy_name(&self) -> &'static str;
}

/// LFU-specific read-only queries.
pub trait LfuStore<K, V>: BoundedStore<K, V> {
    /// Access frequency of `key` (1 right after insertion).
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Lowest frequency currently held; `None` while empty.
    fn min_frequency(&self) -> Option<u64>;

    /// The entry that the next overflow would evict.
    fn peek_lfu(&self) -> Option<(&K, &V)>;
}

/// Renders the cache contents, one `key: value` line per entry in key order.
///
/// ```
/// use policy_cache::policy::fifo::FifoCache;
/// use policy_cache::traits::{BoundedStore, render};
///
/// let mut cache = FifoCache::default();
/// cache.insert("B", "World");
/// cache.insert("A", "Hello");
/// assert_eq!(render(&cache), "Current cache:\nA: Hello\nB: World\n");
/// ```
pub fn render<C, K, V>(cache: &C) -> String
where
    C: BoundedStore<K, V> + ?Sized,
    K: Ord + Display,
    V: Display,
{
    let mut entries = cache.entries();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::from("Current cache:\n");
    for (key, value) in entries {
        out.push_str(&format!("{}: {}\n", key, value));
    }
    out
}
