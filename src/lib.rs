//! Snapview Library
//!
//! Browse captured UI-hierarchy snapshots and their preview screenshots,
//! with a bounded, background-loading preview cache.

pub mod blob;
pub mod cli;
pub mod config;
pub mod logging;
pub mod preview;
pub mod snapshot;
pub mod storage;

pub use blob::{BlobRegistry, PreviewBlob};
pub use config::Config;
pub use preview::{CacheController, CacheLimit, LoadError, PreviewEvent, ResourceCache};
pub use snapshot::{group_snapshots, PackageGroup, SnapshotMeta};
pub use storage::SnapshotStore;
