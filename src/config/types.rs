//! Configuration type definitions and defaults

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Preview cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Maximum number of materialized previews kept at once
    #[serde(default = "default_cache_limit")]
    pub cache_limit: usize,
    /// Background loader threads
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Shown when a snapshot has no screenshot
    #[serde(default = "default_empty_error_text")]
    pub empty_error_text: String,
    /// Shown when loading a screenshot failed
    #[serde(default = "default_load_error_text")]
    pub load_error_text: String,
    /// How long CLI commands wait for outstanding loads
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
}

pub fn default_cache_limit() -> usize {
    20
}

pub fn default_workers() -> usize {
    crate::preview::worker::DEFAULT_POOL_SIZE
}

pub fn default_empty_error_text() -> String {
    "No preview available".to_string()
}

pub fn default_load_error_text() -> String {
    "Failed to load preview".to_string()
}

pub fn default_settle_timeout_ms() -> u64 {
    5000
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cache_limit: default_cache_limit(),
            workers: default_workers(),
            empty_error_text: default_empty_error_text(),
            load_error_text: default_load_error_text(),
            settle_timeout_ms: default_settle_timeout_ms(),
        }
    }
}

/// Snapshot storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `<id>.json` snapshots and `<id>.png` screenshots
    #[serde(default = "default_directory")]
    pub directory: String,
}

pub fn default_directory() -> String {
    "~/.local/share/snapview/snapshots".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}
