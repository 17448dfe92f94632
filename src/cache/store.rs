//! Cache Store Module
//!
//! Main store engine: a HashMap behind a single store-wide mutex, with lazy
//! expiry on every read and proactive sweeps scheduled on write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_expiry_sweeper, ScheduledSweep};

// == Guarded State ==
/// Everything the mutex protects.
#[derive(Debug)]
struct State<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
}

impl<V> State<V> {
    /// Returns the live entry for `key`, removing it first if its deadline has passed.
    fn live_entry(&mut self, key: &str, now: DateTime<Utc>) -> Option<&CacheEntry<V>> {
        if self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now))
        {
            self.entries.remove(key);
            self.stats.record_expired();
        }
        self.entries.get(key)
    }
}

pub(crate) struct StoreInner<V> {
    state: Mutex<State<V>>,
    /// Feeds deadlines to the expiry sweeper, if one is running
    sweeps: Option<mpsc::UnboundedSender<ScheduledSweep>>,
}

// == Store ==
/// Concurrency-safe key-value store with per-entry deadlines.
///
/// Cloning a `Store` is cheap and yields another handle to the same map.
/// Every operation takes the single store-wide lock for its full duration,
/// so a lookup, its expiry check and any resulting removal happen as one step.
///
/// Values are handed out as clones; nothing outside the store ever holds a
/// reference into the map.
pub struct Store<V> {
    inner: Arc<StoreInner<V>>,
}

impl<V> Clone for Store<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Store<V> {
    // == Constructor ==
    /// Creates a store without a background sweeper.
    ///
    /// Expired entries are still never observable, they are just only reclaimed
    /// when something reads them.
    pub fn new() -> Self {
        Self::build(None)
    }

    fn build(sweeps: Option<mpsc::UnboundedSender<ScheduledSweep>>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(State {
                    entries: HashMap::new(),
                    stats: CacheStats::new(),
                }),
                sweeps,
            }),
        }
    }

    /// No critical section can leave the map half-written, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, State<V>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn downgrade(&self) -> WeakStore<V> {
        WeakStore(Arc::downgrade(&self.inner))
    }

    /// Inserts or overwrites while the caller already holds the lock.
    fn insert_locked(
        &self,
        state: &mut State<V>,
        key: String,
        value: V,
        expires_at: Option<DateTime<Utc>>,
    ) {
        if let (Some(deadline), Some(sweeps)) = (expires_at, &self.inner.sweeps) {
            // A closed channel only means proactive reclamation stopped; reads still expire the key.
            let _ = sweeps.send(ScheduledSweep {
                due: deadline,
                key: key.clone(),
            });
        }
        state.entries.insert(key, CacheEntry::new(value, expires_at));
        let count = state.entries.len();
        state.stats.set_total_entries(count);
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// `expires_at` of `None` means the entry never expires. A deadline in the
    /// past is accepted; the entry is simply never observable. When a sweeper
    /// is attached, a proactive removal is scheduled for the deadline.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: V,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut state = self.lock();
        self.insert_locked(&mut state, key.into(), value, expires_at);
        Ok(())
    }

    // == Delete ==
    /// Removes the entry for `key`. Returns whether anything was removed;
    /// deleting an absent key is not an error.
    pub fn delete(&self, key: &str) -> bool {
        let mut state = self.lock();
        let removed = state.entries.remove(key).is_some();
        let count = state.entries.len();
        state.stats.set_total_entries(count);
        removed
    }

    // == Sweep ==
    /// Removes `key` only if the entry currently stored under it has expired.
    ///
    /// A sweep that wakes after its key was overwritten or deleted finds a
    /// live entry or nothing, and leaves it alone.
    pub fn sweep(&self, key: &str) -> bool {
        let mut state = self.lock();
        let expired = state
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(Utc::now()));
        if expired {
            state.entries.remove(key);
            state.stats.record_expired();
            let count = state.entries.len();
            state.stats.set_total_entries(count);
        }
        expired
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Length ==
    /// Number of entries held, including expired ones nobody has read or swept yet.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl<V: Clone> Store<V> {
    // == Get ==
    /// Returns a clone of the value stored under `key`.
    ///
    /// An entry whose deadline is at or before now is removed and reported as
    /// `NotFound`, whether or not a sweep has already run for it.
    pub fn get(&self, key: &str) -> Result<V> {
        let mut state = self.lock();
        let value = state
            .live_entry(key, Utc::now())
            .map(|entry| entry.value.clone());
        match value {
            Some(value) => {
                state.stats.record_hit();
                Ok(value)
            }
            None => {
                state.stats.record_miss();
                let count = state.entries.len();
                state.stats.set_total_entries(count);
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    // == Key Exists ==
    /// Same check as [`Store::get`], without cloning the value out.
    pub fn key_exists(&self, key: &str) -> bool {
        let mut state = self.lock();
        let exists = state.live_entry(key, Utc::now()).is_some();
        if exists {
            state.stats.record_hit();
        } else {
            state.stats.record_miss();
            let count = state.entries.len();
            state.stats.set_total_entries(count);
        }
        exists
    }

    // == Ensure Key ==
    /// Inserts `value` under `key` only if no live entry exists.
    ///
    /// Returns the value now stored and whether this call inserted it. When
    /// the key was already present the existing value comes back, which may
    /// differ from `value`. The presence check and the insert share one lock
    /// acquisition, so racing callers always agree on a single winner.
    pub fn ensure_key(
        &self,
        key: impl Into<String>,
        value: V,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(V, bool)> {
        let key = key.into();
        let mut state = self.lock();
        if let Some(existing) = state.live_entry(&key, Utc::now()) {
            return Ok((existing.value.clone(), false));
        }
        self.insert_locked(&mut state, key, value.clone(), expires_at);
        Ok((value, true))
    }
}

impl<V: Clone + Send + 'static> Store<V> {
    /// Creates a store with a background expiry sweeper.
    ///
    /// Each deadline set on the store is revisited `grace` after it passes.
    /// The sweeper stops on its own once every handle to the store is
    /// dropped; the returned handle can also be aborted directly.
    ///
    /// # Panics
    /// Panics if called outside of a Tokio runtime.
    pub fn with_sweeper(grace: Duration) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Self::build(Some(tx));
        let handle = spawn_expiry_sweeper(store.downgrade(), rx, grace);
        (store, handle)
    }
}

// == Weak Handle ==
/// Non-owning handle used by the sweeper so it never keeps the store alive.
pub(crate) struct WeakStore<V>(Weak<StoreInner<V>>);

impl<V> WeakStore<V> {
    pub(crate) fn upgrade(&self) -> Option<Store<V>> {
        self.0.upgrade().map(|inner| Store { inner })
    }
}
