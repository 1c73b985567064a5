//! Background worker pool for preview loading
//!
//! Processes load requests across multiple worker threads and sends results
//! back via channels. A panicking loader is caught and reported as a failed
//! load so the requesting key never stays stuck in the loading state.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tracing::debug;

use super::error::{LoadError, LoadOutcome};
use super::handle::PreviewLoader;
use super::PreviewKey;

/// A load request dispatched to the pool
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest {
    pub key: PreviewKey,
    /// Identifies this particular load; completions for older tickets are stale
    pub ticket: u64,
}

/// Result of a background load operation
#[derive(Debug)]
pub struct LoadResult {
    pub key: PreviewKey,
    pub ticket: u64,
    pub outcome: LoadOutcome,
}

/// Default number of worker threads in the pool
pub const DEFAULT_POOL_SIZE: usize = 4;

/// Run `loader` for one request, converting a panic into a failed outcome.
pub fn run_load<L: PreviewLoader + ?Sized>(loader: &L, request: LoadRequest) -> LoadResult {
    let outcome = match catch_unwind(AssertUnwindSafe(|| loader.load(request.key))) {
        Ok(result) => LoadOutcome::from(result),
        Err(payload) => LoadOutcome::LoadFailure(LoadError::from_panic(payload)),
    };
    LoadResult {
        key: request.key,
        ticket: request.ticket,
        outcome,
    }
}

/// Spawn a pool of worker threads that process load requests in parallel.
///
/// Each worker pulls requests from the shared `request_rx` channel, calls
/// `loader`, and sends the `LoadResult` back via its clone of `result_tx`.
/// Workers exit when the request channel is closed (all senders dropped).
pub fn spawn_worker_pool<L: PreviewLoader>(
    num_threads: usize,
    request_rx: Receiver<LoadRequest>,
    result_tx: Sender<LoadResult>,
    loader: Arc<L>,
) {
    let request_rx = Arc::new(Mutex::new(request_rx));

    for index in 0..num_threads.max(1) {
        let rx = Arc::clone(&request_rx);
        let tx = result_tx.clone();
        let loader = Arc::clone(&loader);

        let spawned = thread::Builder::new()
            .name(format!("preview-worker-{}", index))
            .spawn(move || loop {
                let request = {
                    let rx = rx.lock().unwrap_or_else(PoisonError::into_inner);
                    match rx.recv() {
                        Ok(request) => request,
                        Err(_) => return, // channel closed
                    }
                };
                let result = run_load(loader.as_ref(), request);
                // Ignore send errors (controller may have been dropped)
                let _ = tx.send(result);
            });
        if let Err(e) = spawned {
            debug!(error = %e, "failed to spawn preview worker");
        }
    }
    // Drop the original result_tx so the channel closes only when all workers exit
    drop(result_tx);
}
