//! Loader and materializer seams, plus the scoped resource handle.
//!
//! A `ResourceHandle` pairs one `Materializer::wrap` with exactly one
//! `Materializer::release`: the release runs when the handle is dropped,
//! whichever path drops it (eviction, explicit clear, teardown, unwinding).

use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::sync::Arc;

use super::error::LoadError;
use super::PreviewKey;

/// Fetches the raw preview bytes for a key.
///
/// Runs on background worker threads. `Ok(None)` means there is nothing
/// to show for the key, which is not a fault.
pub trait PreviewLoader: Send + Sync + 'static {
    fn load(&self, key: PreviewKey) -> Result<Option<Vec<u8>>, LoadError>;
}

impl<F> PreviewLoader for F
where
    F: Fn(PreviewKey) -> Result<Option<Vec<u8>>, LoadError> + Send + Sync + 'static,
{
    fn load(&self, key: PreviewKey) -> Result<Option<Vec<u8>>, LoadError> {
        self(key)
    }
}

/// Turns raw bytes into a display-ready handle and reclaims it again.
///
/// Both methods are only called from the controller's own thread.
pub trait Materializer {
    type Handle;

    /// Materialize `bytes` loaded for `key`.
    fn wrap(&self, key: PreviewKey, bytes: Vec<u8>) -> Result<Self::Handle, LoadError>;

    /// Reclaim everything `wrap` allocated for `handle`.
    fn release(&self, handle: Self::Handle);
}

/// Exclusively owned handle that releases itself on drop.
pub struct ResourceHandle<M: Materializer> {
    handle: ManuallyDrop<M::Handle>,
    materializer: Arc<M>,
}

impl<M: Materializer> ResourceHandle<M> {
    /// Materialize `bytes` through `materializer`, taking ownership of the result.
    pub fn acquire(
        materializer: &Arc<M>,
        key: PreviewKey,
        bytes: Vec<u8>,
    ) -> Result<Self, LoadError> {
        let handle = materializer.wrap(key, bytes)?;
        Ok(Self {
            handle: ManuallyDrop::new(handle),
            materializer: Arc::clone(materializer),
        })
    }
}

impl<M: Materializer> Deref for ResourceHandle<M> {
    type Target = M::Handle;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<M: Materializer> Drop for ResourceHandle<M> {
    fn drop(&mut self) {
        // SAFETY: `handle` is never touched again after this take.
        let handle = unsafe { ManuallyDrop::take(&mut self.handle) };
        self.materializer.release(handle);
    }
}

impl<M> fmt::Debug for ResourceHandle<M>
where
    M: Materializer,
    M::Handle: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceHandle").field(&*self.handle).finish()
    }
}
