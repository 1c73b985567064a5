//! Command handlers for the snapview CLI.
//!
//! Each submodule handles a specific CLI command or command group.
//! The main dispatch logic remains in main.rs.

pub mod config;
pub mod list;
pub mod preview;
pub mod status;

use anyhow::Result;
use std::path::Path;

use snapview::{Config, SnapshotStore};

/// Load the config from `--config` if given, else from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Snapshot store for `--dir`, falling back to the configured directory.
pub fn open_store(config: &Config, dir: Option<&Path>) -> SnapshotStore {
    match dir {
        Some(dir) => SnapshotStore::new(dir),
        None => SnapshotStore::from_config(config),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}
