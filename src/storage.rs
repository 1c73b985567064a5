//! Snapshot and screenshot storage
//!
//! A snapshot directory holds `<id>.json` metadata files next to `<id>.png`
//! screenshots. `SnapshotStore` lists and reads them, and serves as the
//! preview loader for the cache.

use anyhow::{Context, Result};
use humansize::{format_size, BINARY};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Config;
use crate::preview::{LoadError, PreviewKey, PreviewLoader};
use crate::snapshot::{normalize, SnapshotMeta};

/// Storage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    pub snapshot_count: usize,
    pub screenshot_count: usize,
    pub screenshot_bytes: u64,
}

impl StorageStats {
    /// Get human-readable screenshot size
    pub fn size_human(&self) -> String {
        format_size(self.screenshot_bytes, BINARY)
    }

    /// Format a summary for display
    pub fn summary(&self) -> String {
        format!(
            "Snapshots: {} ({} screenshots, {})",
            self.snapshot_count,
            self.screenshot_count,
            self.size_human()
        )
    }
}

/// Directory of captured snapshots
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the configured storage directory
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.storage_directory())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, id: PreviewKey) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub fn screenshot_path(&self, id: PreviewKey) -> PathBuf {
        self.dir.join(format!("{}.png", id))
    }

    /// List all snapshots, normalized, oldest id first.
    ///
    /// Unreadable or malformed metadata files are skipped with a warning.
    pub fn list_snapshots(&self) -> Result<Vec<SnapshotMeta>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read snapshot directory: {:?}", self.dir))?;

        let mut snapshots = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                match Self::read_meta(&path) {
                    Ok(meta) => snapshots.push(normalize(meta)),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping snapshot"),
                }
            }
        }

        snapshots.sort_by_key(|s| s.id);
        Ok(snapshots)
    }

    /// Read one snapshot's metadata
    pub fn snapshot(&self, id: PreviewKey) -> Result<SnapshotMeta> {
        Self::read_meta(&self.snapshot_path(id)).map(normalize)
    }

    /// Read a screenshot. A missing or zero-length file means there is none.
    pub fn read_screenshot(&self, id: PreviewKey) -> Result<Option<Vec<u8>>, LoadError> {
        match fs::read(self.screenshot_path(id)) {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoadError::Io(e)),
        }
    }

    /// Write a snapshot's metadata and optional screenshot
    pub fn save(&self, meta: &SnapshotMeta, screenshot: Option<&[u8]>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create snapshot directory: {:?}", self.dir))?;

        let json = serde_json::to_string_pretty(meta).context("Failed to serialize snapshot")?;
        let path = self.snapshot_path(meta.id);
        fs::write(&path, json).with_context(|| format!("Failed to write snapshot: {:?}", path))?;

        if let Some(bytes) = screenshot {
            let path = self.screenshot_path(meta.id);
            fs::write(&path, bytes)
                .with_context(|| format!("Failed to write screenshot: {:?}", path))?;
        }
        Ok(())
    }

    pub fn get_stats(&self) -> Result<StorageStats> {
        let mut stats = StorageStats {
            snapshot_count: self.list_snapshots()?.len(),
            ..StorageStats::default()
        };
        if !self.dir.exists() {
            return Ok(stats);
        }
        for entry in fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "png") {
                stats.screenshot_count += 1;
                stats.screenshot_bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
        Ok(stats)
    }

    fn read_meta(path: &Path) -> Result<SnapshotMeta> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {:?}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot: {:?}", path))
    }
}

impl PreviewLoader for SnapshotStore {
    fn load(&self, key: PreviewKey) -> Result<Option<Vec<u8>>, LoadError> {
        self.read_screenshot(key)
    }
}
