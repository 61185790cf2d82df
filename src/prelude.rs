pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::discard::{DiscardEvent, DiscardListener, DiscardLog};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{CacheMetricsSnapshot, MetricsSnapshotProvider};
pub use crate::policy::fifo::FifoCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lifo::LifoCache;
pub use crate::policy::lru::LruCache;
pub use crate::traits::{BoundedStore, LfuStore, MAX_ITEMS, render};
