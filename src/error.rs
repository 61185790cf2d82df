//! Error types for the policy-cache library.
//!
//! Cache operations themselves never fail: absent keys and values are no-ops
//! and lookup misses return `None`. Errors only appear at two seams:
//!
//! - [`ConfigError`]: returned when cache configuration is rejected (zero
//!   capacity in [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build),
//!   unknown policy names when parsing [`CachePolicy`](crate::builder::CachePolicy)).
//! - [`InvariantError`]: returned by `check_invariants` when the index and the
//!   ordering structure of a policy disagree.
//!
//! ## Example Usage
//!
//! ```
//! use policy_cache::builder::{CacheBuilder, CachePolicy};
//! use policy_cache::error::ConfigError;
//!
//! let policy: Result<CachePolicy, ConfigError> = "lfu".parse();
//! assert_eq!(policy, Ok(CachePolicy::Lfu));
//!
//! let bad = CacheBuilder::new(0).try_build::<u32, u32>(CachePolicy::Lru);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on the policy types
/// (e.g. [`LfuCache::check_invariants`](crate::policy::lfu::LfuCache::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// # Example
///
/// ```
/// use policy_cache::builder::CachePolicy;
///
/// let err = "mru".parse::<CachePolicy>().unwrap_err();
/// assert!(err.to_string().contains("mru"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Returns `Err(InvariantError)` with `msg` when `cond` is false.
#[inline]
pub(crate) fn ensure(cond: bool, msg: impl FnOnce() -> String) -> Result<(), InvariantError> {
    if cond {
        Ok(())
    } else {
        Err(InvariantError::new(msg()))
    }
}
