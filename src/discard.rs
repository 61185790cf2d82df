//! Discard notifications.
//!
//! Every eviction produces exactly one [`DiscardEvent`]. The event is always
//! emitted as a `tracing` event at `INFO` level under the
//! `policy_cache::discard` target, with the message `DISCARD: <key>`, and is
//! also handed to the cache's [`DiscardListener`] if one is installed.
//!
//! The tracing message and its `key` field render the key with `Debug`, since
//! caches only require `K: Debug`. String keys therefore appear quoted
//! (`DISCARD: "A"`, `key="A"`). The unquoted `Display` form is what
//! [`DiscardEvent`] and [`DiscardLog::lines`] produce.
//!
//! ```text
//!   insert(E) on a full cache
//!        │
//!        ▼
//!   policy picks victim ──► remove from index + order
//!        │
//!        ▼
//!   Discarder::notify(victim)
//!        ├──► tracing::info!(target: "policy_cache::discard", "DISCARD: ..")
//!        └──► listener.on_discard(&DiscardEvent { policy, key })
//! ```
//!
//! ## Recording discards in tests
//!
//! ```
//! use policy_cache::discard::DiscardLog;
//! use policy_cache::policy::lfu::LfuCache;
//! use policy_cache::traits::BoundedStore;
//!
//! let log: DiscardLog<&str> = DiscardLog::new();
//! let mut cache = LfuCache::default().with_listener(log.clone());
//!
//! for key in ["A", "B", "C", "D"] {
//!     cache.insert(key, ());
//! }
//! cache.get(&"A");
//! cache.insert("E", ());
//!
//! assert_eq!(log.lines(), vec!["DISCARD: B".to_string()]);
//! ```

use std::fmt::{self, Debug, Display};
use std::sync::Arc;

use parking_lot::Mutex;

/// One eviction: which policy discarded which key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardEvent<K> {
    pub policy: &'static str,
    pub key: K,
}

impl<K: Display> Display for DiscardEvent<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DISCARD: {}", self.key)
    }
}

/// Receives discard events from a cache.
///
/// Implemented for `FnMut(&DiscardEvent<K>) + Send` closures and for
/// [`DiscardLog`].
pub trait DiscardListener<K>: Send {
    fn on_discard(&mut self, event: &DiscardEvent<K>);
}

impl<K, F> DiscardListener<K> for F
where
    F: FnMut(&DiscardEvent<K>) + Send,
{
    fn on_discard(&mut self, event: &DiscardEvent<K>) {
        self(event)
    }
}

/// Shared, cloneable record of discarded keys.
///
/// Clones share the same buffer, so one handle can be moved into a cache while
/// another is kept to inspect what was evicted.
pub struct DiscardLog<K> {
    keys: Arc<Mutex<Vec<K>>>,
}

impl<K> DiscardLog<K> {
    pub fn new() -> Self {
        Self {
            keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of discards recorded so far.
    pub fn len(&self) -> usize {
        self.keys.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.lock().is_empty()
    }

    /// Drains and returns the recorded keys.
    pub fn take(&self) -> Vec<K> {
        std::mem::take(&mut *self.keys.lock())
    }
}

impl<K: Clone> DiscardLog<K> {
    /// Recorded keys, oldest discard first.
    pub fn keys(&self) -> Vec<K> {
        self.keys.lock().clone()
    }
}

impl<K: Display> DiscardLog<K> {
    /// Recorded discards rendered as `DISCARD: <key>` lines.
    pub fn lines(&self) -> Vec<String> {
        self.keys
            .lock()
            .iter()
            .map(|key| format!("DISCARD: {}", key))
            .collect()
    }
}

impl<K> Clone for DiscardLog<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}

impl<K> Default for DiscardLog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug> Debug for DiscardLog<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscardLog")
            .field("keys", &*self.keys.lock())
            .finish()
    }
}

impl<K: Clone + Send> DiscardListener<K> for DiscardLog<K> {
    fn on_discard(&mut self, event: &DiscardEvent<K>) {
        self.keys.lock().push(event.key.clone());
    }
}

/// Per-cache discard sink: tracing plus an optional listener.
pub(crate) struct Discarder<K> {
    policy: &'static str,
    listener: Option<Box<dyn DiscardListener<K>>>,
}

impl<K> Discarder<K> {
    pub(crate) fn has_listener(&self) -> bool {
        self.listener.is_some()
    }
}

impl<K: Debug> Discarder<K> {
    pub(crate) fn new(policy: &'static str) -> Self {
        Self {
            policy,
            listener: None,
        }
    }

    pub(crate) fn set_listener(&mut self, listener: Box<dyn DiscardListener<K>>) {
        self.listener = Some(listener);
    }

    /// Reports `key` as discarded and hands it back.
    pub(crate) fn notify(&mut self, key: K) -> K {
        tracing::info!(
            target: "policy_cache::discard",
            policy = self.policy,
            key = ?key,
            "DISCARD: {:?}",
            key
        );

        match self.listener.as_mut() {
            Some(listener) => {
                let event = DiscardEvent {
                    policy: self.policy,
                    key,
                };
                listener.on_discard(&event);
                event.key
            },
            None => key,
        }
    }
}

impl<K> Debug for Discarder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Discarder")
            .field("policy", &self.policy)
            .field("listener", &self.has_listener())
            .finish()
    }
}
