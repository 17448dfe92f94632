//! Cache Module
//!
//! Provides the in-memory key-value store with per-entry deadlines.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::Store;
pub(crate) use store::WeakStore;
