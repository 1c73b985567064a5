//! Bounded preview cache with background loading
//!
//! `ResourceCache` holds materialized preview handles under a strict LRU
//! bound; `CacheController` de-duplicates loads, classifies their outcomes
//! and guarantees every handle is released exactly once.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use snapview::blob::BlobRegistry;
//! use snapview::config::PreviewConfig;
//! use snapview::preview::{CacheController, LoadError};
//!
//! let loader = |id: u64| -> Result<Option<Vec<u8>>, LoadError> {
//!     Ok(std::fs::read(format!("/tmp/shots/{}.png", id)).ok())
//! };
//! let mut previews = CacheController::new(
//!     &PreviewConfig::default(),
//!     loader,
//!     Arc::new(BlobRegistry::new()),
//! );
//! previews.ensure(1700000000000);
//! previews.settle(Duration::from_secs(1));
//! if let Some(blob) = previews.handle_of(1700000000000) {
//!     println!("{}", blob.url);
//! }
//! ```

pub mod cache;
pub mod controller;
pub mod error;
pub mod handle;
pub mod limit;
pub mod worker;

/// Identifier of a snapshot preview
pub type PreviewKey = u64;

pub use cache::{CacheStats, ResourceCache};
pub use controller::{CacheController, PreviewEvent};
pub use error::{LoadError, LoadOutcome};
pub use handle::{Materializer, PreviewLoader, ResourceHandle};
pub use limit::CacheLimit;
