//! Unified cache builder for all eviction policies.
//!
//! Picks a policy at runtime (for example from a config string) and hands back
//! either an enum-dispatched [`Cache`] or a boxed trait object.
//!
//! ## Example
//!
//! ```rust
//! use policy_cache::builder::{CacheBuilder, CachePolicy};
//! use policy_cache::traits::BoundedStore;
//!
//! let policy: CachePolicy = "lru".parse().unwrap();
//! let mut cache = CacheBuilder::default().build::<u64, String>(policy);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! assert_eq!(cache.capacity(), 4);
//! ```

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::str::FromStr;

use crate::discard::DiscardListener;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetricsSnapshot, MetricsSnapshotProvider};
use crate::policy::fifo::FifoCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lifo::LifoCache;
use crate::policy::lru::LruCache;
use crate::traits::{BoundedStore, MAX_ITEMS};

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// First In, First Out eviction.
    Fifo,
    /// Last In, First Out eviction.
    Lifo,
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction, oldest first among ties.
    Lfu,
}

impl CachePolicy {
    /// Every policy, in declaration order.
    pub const ALL: [CachePolicy; 4] = [
        CachePolicy::Fifo,
        CachePolicy::Lifo,
        CachePolicy::Lru,
        CachePolicy::Lfu,
    ];

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            CachePolicy::Fifo => "fifo",
            CachePolicy::Lifo => "lifo",
            CachePolicy::Lru => "lru",
            CachePolicy::Lfu => "lfu",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CachePolicy::ALL
            .into_iter()
            .find(|policy| policy.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "unknown cache policy `{}` (expected fifo, lifo, lru or lfu)",
                    wanted
                ))
            })
    }
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Fifo(FifoCache<K, V>),
    Lifo(LifoCache<K, V>),
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
}

macro_rules! dispatch {
    ($inner:expr, $cache:ident => $body:expr) => {
        match $inner {
            CacheInner::Fifo($cache) => $body,
            CacheInner::Lifo($cache) => $body,
            CacheInner::Lru($cache) => $body,
            CacheInner::Lfu($cache) => $body,
        }
    };
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Policy backing this cache.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Fifo(_) => CachePolicy::Fifo,
            CacheInner::Lifo(_) => CachePolicy::Lifo,
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Lfu(_) => CachePolicy::Lfu,
        }
    }

    /// Installs a discard listener and returns the cache.
    pub fn with_listener(mut self, listener: impl DiscardListener<K> + 'static) -> Self {
        dispatch!(&mut self.inner, cache => cache.set_listener(listener));
        self
    }

    /// The LFU cache behind this wrapper, for frequency queries.
    pub fn as_lfu(&self) -> Option<&LfuCache<K, V>> {
        match &self.inner {
            CacheInner::Lfu(lfu) => Some(lfu),
            _ => None,
        }
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        dispatch!(&self.inner, cache => cache.check_invariants())
    }
}

impl<K, V> BoundedStore<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn insert(&mut self, key: K, value: V) -> Option<K> {
        dispatch!(&mut self.inner, cache => cache.insert(key, value))
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        dispatch!(&mut self.inner, cache => cache.get(key))
    }

    fn lookup(&mut self, key: Option<&K>) -> Option<&V> {
        dispatch!(&mut self.inner, cache => cache.lookup(key))
    }

    fn peek(&self, key: &K) -> Option<&V> {
        dispatch!(&self.inner, cache => cache.peek(key))
    }

    fn len(&self) -> usize {
        dispatch!(&self.inner, cache => cache.len())
    }

    fn capacity(&self) -> usize {
        dispatch!(&self.inner, cache => cache.capacity())
    }

    fn clear(&mut self) {
        dispatch!(&mut self.inner, cache => cache.clear())
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        dispatch!(&self.inner, cache => cache.entries())
    }

    fn policy_name(&self) -> &'static str {
        self.policy().name()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider for Cache<K, V> {
    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        dispatch!(&self.inner, cache => cache.metrics_snapshot())
    }
}

impl<K, V> Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(&self.inner, cache => Debug::fmt(cache, f))
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Build a cache with the specified policy.
    ///
    /// A zero capacity is accepted here and yields a cache that stores
    /// nothing; use [`try_build`](Self::try_build) to reject it.
    ///
    /// ```rust
    /// use policy_cache::builder::{CacheBuilder, CachePolicy};
    /// use policy_cache::traits::BoundedStore;
    ///
    /// let mut cache = CacheBuilder::new(2).build::<u64, &str>(CachePolicy::Lifo);
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    /// assert_eq!(cache.insert(3, "three"), Some(2));
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone + Debug,
    {
        let inner = match policy {
            CachePolicy::Fifo => CacheInner::Fifo(FifoCache::new(self.capacity)),
            CachePolicy::Lifo => CacheInner::Lifo(LifoCache::new(self.capacity)),
            CachePolicy::Lru => CacheInner::Lru(LruCache::new(self.capacity)),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCache::new(self.capacity)),
        };
        tracing::debug!(policy = policy.name(), capacity = self.capacity, "built cache");

        Cache { inner }
    }

    /// Like [`build`](Self::build), but rejects a zero capacity.
    pub fn try_build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone + Debug,
    {
        if self.capacity == 0 {
            return Err(ConfigError::new(format!(
                "{} cache capacity must be greater than zero",
                policy
            )));
        }
        Ok(self.build(policy))
    }

    /// Builds the policy behind a trait object.
    pub fn build_boxed<K, V>(self, policy: CachePolicy) -> Box<dyn BoundedStore<K, V> + Send>
    where
        K: Eq + Hash + Clone + Debug + Send + 'static,
        V: Send + 'static,
    {
        match policy {
            CachePolicy::Fifo => Box::new(FifoCache::new(self.capacity)),
            CachePolicy::Lifo => Box::new(LifoCache::new(self.capacity)),
            CachePolicy::Lru => Box::new(LruCache::new(self.capacity)),
            CachePolicy::Lfu => Box::new(LfuCache::new(self.capacity)),
        }
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::new(MAX_ITEMS)
    }
}
