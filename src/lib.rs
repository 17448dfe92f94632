//! keyval - An in-memory key-value store with per-entry expiration
//!
//! Provides a concurrency-safe store with absolute deadlines, atomic
//! insert-if-absent, lazy expiry on read and a background sweeper, served
//! over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::Store;
pub use config::Config;
pub use error::CacheError;
