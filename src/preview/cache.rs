//! Bounded resource cache with LRU eviction
//!
//! Owns the installed handles, the recency order used for eviction and the
//! per-key loading/error state. Performs no I/O; every operation is short
//! and synchronous. Dropping a handle is what releases it, so removing a key
//! from the recency order and dropping its handle always happen together.

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use super::PreviewKey;

/// Per-key state. An entry exists while it holds a handle, a load or an error.
#[derive(Debug)]
struct Entry<H> {
    handle: Option<H>,
    /// Ticket of the in-flight load, if any
    loading: Option<u64>,
    error: Option<String>,
}

impl<H> Default for Entry<H> {
    fn default() -> Self {
        Self {
            handle: None,
            loading: None,
            error: None,
        }
    }
}

impl<H> Entry<H> {
    fn is_vacant(&self) -> bool {
        self.handle.is_none() && self.loading.is_none() && self.error.is_none()
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Installed handles
    pub entries: usize,
    /// Current capacity bound
    pub capacity: usize,
    /// Keys with a load in flight
    pub loading: usize,
    /// Keys whose last load failed or was empty
    pub errored: usize,
    /// Handles installed over the cache's lifetime
    pub installs: u64,
    /// Handles removed by the capacity bound
    pub evictions: u64,
}

/// Key -> handle map with a strict least-recently-used bound.
#[derive(Debug)]
pub struct ResourceCache<H> {
    entries: HashMap<PreviewKey, Entry<H>>,
    /// LRU order (front = oldest, back = newest); holds exactly the installed keys
    lru_order: VecDeque<PreviewKey>,
    capacity: usize,
    installs: u64,
    evictions: u64,
}

impl<H> ResourceCache<H> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru_order: VecDeque::new(),
            capacity,
            installs: 0,
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of installed handles
    pub fn len(&self) -> usize {
        self.lru_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru_order.is_empty()
    }

    /// Installed keys, least recently used first
    pub fn keys(&self) -> impl Iterator<Item = PreviewKey> + '_ {
        self.lru_order.iter().copied()
    }

    pub fn handle_of(&self, key: PreviewKey) -> Option<&H> {
        self.entries.get(&key).and_then(|e| e.handle.as_ref())
    }

    pub fn is_loading(&self, key: PreviewKey) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|e| e.loading.is_some())
    }

    pub fn error_of(&self, key: PreviewKey) -> Option<&str> {
        self.entries.get(&key).and_then(|e| e.error.as_deref())
    }

    /// Whether `ticket` is the load currently expected for `key`.
    pub fn is_current(&self, key: PreviewKey, ticket: u64) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|e| e.loading == Some(ticket))
    }

    /// Start a load: clears any stale error and records the load's ticket.
    pub fn mark_loading(&mut self, key: PreviewKey, ticket: u64) {
        let entry = self.entries.entry(key).or_default();
        entry.error = None;
        entry.loading = Some(ticket);
    }

    /// Clear the loading flag if `ticket` is still the current load.
    ///
    /// Returns false for a stale completion (the key was cleared or reloaded
    /// since), in which case nothing changes.
    pub fn finish_loading(&mut self, key: PreviewKey, ticket: u64) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) if entry.loading == Some(ticket) => {
                entry.loading = None;
                self.prune(key);
                true
            }
            _ => false,
        }
    }

    pub fn set_error(&mut self, key: PreviewKey, message: impl Into<String>) {
        self.entries.entry(key).or_default().error = Some(message.into());
    }

    pub fn clear_error(&mut self, key: PreviewKey) {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.error = None;
            self.prune(key);
        }
    }

    /// Store `handle` for `key` as the most recently used entry, then evict.
    ///
    /// A handle already installed for `key` is dropped (released) first.
    /// Returns the keys evicted to respect the bound.
    pub fn install(&mut self, key: PreviewKey, handle: H) -> Vec<PreviewKey> {
        let entry = self.entries.entry(key).or_default();
        drop(entry.handle.replace(handle));
        entry.error = None;
        self.installs += 1;
        self.touch_order(key);
        self.evict_overflow()
    }

    /// Mark an installed key as most recently used.
    pub fn touch(&mut self, key: PreviewKey) -> bool {
        if self.handle_of(key).is_some() {
            self.touch_order(key);
            true
        } else {
            false
        }
    }

    /// Change the bound and evict immediately.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<PreviewKey> {
        self.capacity = capacity;
        self.evict_overflow()
    }

    /// Evict oldest entries until the bound holds. Returns the evicted keys.
    pub fn evict_overflow(&mut self) -> Vec<PreviewKey> {
        let mut evicted = Vec::new();
        while self.lru_order.len() > self.capacity {
            let Some(oldest) = self.lru_order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            self.evictions += 1;
            trace!(key = oldest, "evicted preview");
            evicted.push(oldest);
        }
        evicted
    }

    /// Release the handle and forget all state for `key`.
    ///
    /// Returns true if anything was tracked for the key.
    pub fn clear_key(&mut self, key: PreviewKey) -> bool {
        self.lru_order.retain(|&k| k != key);
        self.entries.remove(&key).is_some()
    }

    /// Clear every tracked key. Returns how many handles were released.
    pub fn clear_all(&mut self) -> usize {
        let released = self.lru_order.len();
        let keys: Vec<PreviewKey> = self.entries.keys().copied().collect();
        for key in keys {
            self.clear_key(key);
        }
        released
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.lru_order.len(),
            capacity: self.capacity,
            loading: self.entries.values().filter(|e| e.loading.is_some()).count(),
            errored: self.entries.values().filter(|e| e.error.is_some()).count(),
            installs: self.installs,
            evictions: self.evictions,
        }
    }

    fn touch_order(&mut self, key: PreviewKey) {
        self.lru_order.retain(|&k| k != key);
        self.lru_order.push_back(key);
    }

    fn prune(&mut self, key: PreviewKey) {
        if self.entries.get(&key).is_some_and(Entry::is_vacant) {
            self.entries.remove(&key);
        }
    }
}
