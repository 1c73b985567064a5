//! Preview cache controller
//!
//! Public operation surface over `ResourceCache`: de-duplicated background
//! loads, outcome classification, capacity changes and teardown. The
//! controller is the single writer of cache state; loads run on the worker
//! pool and their results are applied on the controller's thread by
//! `poll()` or `settle()`.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::cache::{CacheStats, ResourceCache};
use super::error::{LoadError, LoadOutcome};
use super::handle::{Materializer, PreviewLoader, ResourceHandle};
use super::limit::CacheLimit;
use super::worker::{spawn_worker_pool, LoadRequest, LoadResult};
use super::PreviewKey;
use crate::config::PreviewConfig;

/// State change applied by `poll()`, for consumers that redraw on change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    /// A handle is now available for the key
    Installed { key: PreviewKey },
    /// The key's handle was released to respect the capacity bound
    Evicted { key: PreviewKey },
    /// The loader had nothing to show for the key
    Empty { key: PreviewKey },
    /// Loading or materializing the key failed
    Failed { key: PreviewKey, reason: String },
}

/// Drives a `ResourceCache` of materialized previews.
pub struct CacheController<M: Materializer> {
    cache: ResourceCache<ResourceHandle<M>>,
    materializer: Arc<M>,
    request_tx: Sender<LoadRequest>,
    result_rx: Receiver<LoadResult>,
    next_ticket: u64,
    empty_error_text: String,
    load_error_text: String,
    /// Watched capacity value and the version last applied
    limit: Option<(CacheLimit, u64)>,
}

impl<M: Materializer> CacheController<M> {
    /// Create a controller and start its worker pool.
    pub fn new<L: PreviewLoader>(config: &PreviewConfig, loader: L, materializer: Arc<M>) -> Self {
        let (request_tx, request_rx) = channel::<LoadRequest>();
        let (result_tx, result_rx) = channel::<LoadResult>();
        spawn_worker_pool(config.workers, request_rx, result_tx, Arc::new(loader));

        Self {
            cache: ResourceCache::new(config.cache_limit),
            materializer,
            request_tx,
            result_rx,
            next_ticket: 1,
            empty_error_text: config.empty_error_text.clone(),
            load_error_text: config.load_error_text.clone(),
            limit: None,
        }
    }

    /// Follow a live capacity value. Its current value applies immediately.
    pub fn watch_capacity(&mut self, limit: CacheLimit) -> Vec<PreviewKey> {
        let version = limit.version();
        let value = limit.get();
        self.limit = Some((limit, version));
        self.on_capacity_changed(value)
    }

    /// Change the capacity bound; excess entries are released right away.
    pub fn on_capacity_changed(&mut self, new_limit: usize) -> Vec<PreviewKey> {
        let evicted = self.cache.set_capacity(new_limit);
        if !evicted.is_empty() {
            debug!(limit = new_limit, evicted = evicted.len(), "capacity shrank");
        }
        evicted
    }

    /// Request a preview for `key` (non-blocking).
    ///
    /// Skips the request if the key is already installed or loading. An
    /// errored key is retried.
    pub fn ensure(&mut self, key: PreviewKey) {
        self.sync_limit();
        if self.cache.handle_of(key).is_some() || self.cache.is_loading(key) {
            return;
        }

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.cache.mark_loading(key, ticket);
        debug!(key, ticket, "dispatching preview load");

        if self.request_tx.send(LoadRequest { key, ticket }).is_err() {
            warn!(key, "preview worker pool is gone");
            self.cache.finish_loading(key, ticket);
            self.cache.set_error(key, self.load_error_text.clone());
        }
    }

    /// Request several keys at once
    pub fn ensure_all(&mut self, keys: &[PreviewKey]) {
        for &key in keys {
            self.ensure(key);
        }
    }

    /// Apply completed loads without blocking.
    pub fn poll(&mut self) -> Vec<PreviewEvent> {
        let mut events = self.limit_events();
        while let Ok(result) = self.result_rx.try_recv() {
            self.apply(result, &mut events);
        }
        events
    }

    /// Block until no load is in flight or `timeout` elapses.
    ///
    /// Returns true if every load settled.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut events = self.poll();
        while self.loading_count() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.result_rx.recv_timeout(remaining) {
                Ok(result) => self.apply(result, &mut events),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    /// Release the handle and state of a single key.
    pub fn invalidate(&mut self, key: PreviewKey) -> bool {
        self.cache.clear_key(key)
    }

    /// Mark an installed key as most recently used.
    pub fn touch(&mut self, key: PreviewKey) -> bool {
        self.cache.touch(key)
    }

    /// Release every handle and forget all state.
    ///
    /// Loads still in flight are orphaned: their results are discarded on
    /// arrival. Also runs on drop.
    pub fn clear(&mut self) -> usize {
        let released = self.cache.clear_all();
        if released > 0 {
            debug!(released, "cleared preview cache");
        }
        released
    }

    pub fn handle_of(&self, key: PreviewKey) -> Option<&M::Handle> {
        self.cache.handle_of(key).map(|handle| &**handle)
    }

    pub fn is_loading(&self, key: PreviewKey) -> bool {
        self.cache.is_loading(key)
    }

    pub fn error_of(&self, key: PreviewKey) -> Option<&str> {
        self.cache.error_of(key)
    }

    /// Installed keys, least recently used first
    pub fn keys(&self) -> Vec<PreviewKey> {
        self.cache.keys().collect()
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn materializer(&self) -> &Arc<M> {
        &self.materializer
    }

    fn loading_count(&self) -> usize {
        self.cache.stats().loading
    }

    fn sync_limit(&mut self) -> Vec<PreviewKey> {
        let Some((limit, seen)) = self.limit.as_mut() else {
            return Vec::new();
        };
        if !limit.changed_since(*seen) {
            return Vec::new();
        }
        *seen = limit.version();
        let value = limit.get();
        self.on_capacity_changed(value)
    }

    fn limit_events(&mut self) -> Vec<PreviewEvent> {
        self.sync_limit()
            .into_iter()
            .map(|key| PreviewEvent::Evicted { key })
            .collect()
    }

    fn apply(&mut self, result: LoadResult, events: &mut Vec<PreviewEvent>) {
        let LoadResult {
            key,
            ticket,
            outcome,
        } = result;

        // The loading flag is cleared before the outcome is looked at, so
        // no outcome can leave the key loading.
        if !self.cache.finish_loading(key, ticket) {
            debug!(key, ticket, "discarding stale preview load");
            return;
        }

        match outcome {
            LoadOutcome::Loaded(bytes) => {
                match ResourceHandle::acquire(&self.materializer, key, bytes) {
                    Ok(handle) => {
                        let evicted = self.cache.install(key, handle);
                        debug!(key, evicted = evicted.len(), "installed preview");
                        events.push(PreviewEvent::Installed { key });
                        events.extend(evicted.into_iter().map(|key| PreviewEvent::Evicted { key }));
                    }
                    Err(e) => self.fail(key, e, events),
                }
            }
            LoadOutcome::EmptyResult => {
                self.cache.set_error(key, self.empty_error_text.clone());
                events.push(PreviewEvent::Empty { key });
            }
            LoadOutcome::LoadFailure(e) => self.fail(key, e, events),
        }
    }

    fn fail(&mut self, key: PreviewKey, error: LoadError, events: &mut Vec<PreviewEvent>) {
        warn!(key, error = %error, "preview load failed");
        self.cache.set_error(key, self.load_error_text.clone());
        events.push(PreviewEvent::Failed {
            key,
            reason: error.to_string(),
        });
    }
}

impl<M: Materializer> Drop for CacheController<M> {
    fn drop(&mut self) {
        self.clear();
    }
}
