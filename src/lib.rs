//! policy-cache: bounded in-memory key-value caches with interchangeable
//! eviction policies (FIFO, LIFO, LRU and an O(1) LFU).
//!
//! Every policy implements [`BoundedStore`](traits::BoundedStore). Evictions
//! are reported as `DISCARD: <key>` tracing events and, optionally, to a
//! [`DiscardListener`](discard::DiscardListener).
//!
//! ```
//! use policy_cache::prelude::*;
//!
//! let mut cache = CacheBuilder::default().build::<&str, &str>(CachePolicy::Fifo);
//! for key in ["A", "B", "C", "D"] {
//!     cache.insert(key, "value");
//! }
//! assert!(cache.is_full());
//! assert_eq!(cache.insert("E", "value"), Some("A"));
//! ```

pub mod builder;
pub mod discard;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;
