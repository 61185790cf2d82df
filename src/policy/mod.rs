//! Eviction policies.
//!
//! Each submodule holds one self-contained cache type implementing
//! [`BoundedStore`](crate::traits::BoundedStore).

pub mod fifo;
pub mod lfu;
pub mod lifo;
pub mod lru;
