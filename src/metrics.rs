//! Per-instance operation counters (feature `metrics`).
//!
//! Each policy owns one [`CacheMetrics`] and bumps it on the hot path with
//! plain `u64` increments; nothing is shared between instances. Reading goes
//! through [`MetricsSnapshotProvider::metrics_snapshot`], which copies the
//! counters and captures the current `len`/`capacity` gauges.
//!
//! `lookup(None)` counts as a get miss, the same as `get` on a key that is
//! not cached.
//!
//! ```
//! use policy_cache::metrics::MetricsSnapshotProvider;
//! use policy_cache::policy::lru::LruCache;
//! use policy_cache::traits::BoundedStore;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert(1, "one");
//! cache.insert(2, "two");
//! cache.get(&1);
//! cache.get(&9);
//! cache.insert(3, "three");
//!
//! let snap = cache.metrics_snapshot();
//! assert_eq!(snap.get_hits, 1);
//! assert_eq!(snap.get_misses, 1);
//! assert_eq!(snap.evicted_entries, 1);
//! assert_eq!(snap.hit_rate(), 0.5);
//! ```

/// Counters recorded by a single cache instance.
#[derive(Debug, Default, Clone)]
pub struct CacheMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    /// Inserts refused because the cache has zero capacity.
    pub rejected_inserts: u64,

    pub evicted_entries: u64,
}

impl CacheMetrics {
    #[inline]
    pub fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    #[inline]
    pub fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    #[inline]
    pub fn record_insert_new(&mut self) {
        self.insert_calls += 1;
        self.insert_new += 1;
    }

    #[inline]
    pub fn record_insert_update(&mut self) {
        self.insert_calls += 1;
        self.insert_updates += 1;
    }

    #[inline]
    pub fn record_rejected_insert(&mut self) {
        self.insert_calls += 1;
        self.rejected_inserts += 1;
    }

    #[inline]
    pub fn record_eviction(&mut self) {
        self.evicted_entries += 1;
    }

    /// Copies the counters together with the given gauges.
    pub fn snapshot(&self, cache_len: usize, capacity: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_new: self.insert_new,
            insert_updates: self.insert_updates,
            rejected_inserts: self.rejected_inserts,
            evicted_entries: self.evicted_entries,
            cache_len,
            capacity,
        }
    }
}

/// Point-in-time copy of a cache's counters.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub rejected_inserts: u64,

    pub evicted_entries: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl CacheMetricsSnapshot {
    /// Fraction of `get` calls that hit; `0.0` before the first call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

/// Types that can produce a [`CacheMetricsSnapshot`].
pub trait MetricsSnapshotProvider {
    fn metrics_snapshot(&self) -> CacheMetricsSnapshot;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut m = CacheMetrics::default();
        m.record_get_hit();
        m.record_get_hit();
        m.record_get_miss();
        m.record_insert_new();
        m.record_insert_update();
        m.record_rejected_insert();
        m.record_eviction();

        let snap = m.snapshot(3, 4);
        assert_eq!(snap.get_calls, 3);
        assert_eq!(snap.get_hits, 2);
        assert_eq!(snap.get_misses, 1);
        assert_eq!(snap.insert_calls, 3);
        assert_eq!(snap.insert_new, 1);
        assert_eq!(snap.insert_updates, 1);
        assert_eq!(snap.rejected_inserts, 1);
        assert_eq!(snap.evicted_entries, 1);
        assert_eq!(snap.cache_len, 3);
        assert_eq!(snap.capacity, 4);
    }

    #[test]
    fn hit_rate_handles_zero_calls() {
        let snap = CacheMetricsSnapshot::default();
        assert_eq!(snap.hit_rate(), 0.0);

        let mut m = CacheMetrics::default();
        m.record_get_hit();
        m.record_get_miss();
        m.record_get_miss();
        m.record_get_miss();
        assert_eq!(m.snapshot(0, 0).hit_rate(), 0.25);
    }
}
