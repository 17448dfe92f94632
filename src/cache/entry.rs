//! Cache Entry Module
//!
//! Defines the structure for individual entries with an absolute deadline.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// Represents a single stored value with its deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Absolute expiration time, None = never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring at `expires_at`.
    pub fn new(value: V, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks whether the entry is expired relative to `now`.
    ///
    /// An entry whose deadline is exactly `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(deadline) => deadline <= now,
            None => false,
        }
    }
}
