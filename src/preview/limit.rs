//! Live, shareable cache capacity value.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Shared {
    value: AtomicUsize,
    version: AtomicU64,
}

/// Observable capacity bound.
///
/// Clones share the same value. A settings screen holds one clone and calls
/// `set`; the cache controller holds another and reconciles on its next
/// `ensure` or `poll`.
#[derive(Debug, Clone)]
pub struct CacheLimit {
    shared: Arc<Shared>,
}

impl CacheLimit {
    pub fn new(value: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: AtomicUsize::new(value),
                version: AtomicU64::new(0),
            }),
        }
    }

    /// Current bound.
    pub fn get(&self) -> usize {
        self.shared.value.load(Ordering::Acquire)
    }

    /// Replace the bound. Setting the same value again does not bump the version.
    pub fn set(&self, value: usize) {
        let previous = self.shared.value.swap(value, Ordering::AcqRel);
        if previous != value {
            self.shared.version.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Monotonic change counter.
    pub fn version(&self) -> u64 {
        self.shared.version.load(Ordering::Acquire)
    }

    /// Whether the value changed after `version` was observed.
    pub fn changed_since(&self, version: u64) -> bool {
        self.version() != version
    }
}
