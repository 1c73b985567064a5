//! Status command handler

use anyhow::Result;
use std::path::Path;

use snapview::Config;

use super::open_store;

/// Display snapshot storage statistics.
#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, dir: Option<&Path>) -> Result<()> {
    let store = open_store(config, dir);
    let stats = store.get_stats()?;
    println!("Directory: {}", store.dir().display());
    println!("{}", stats.summary());
    println!("Preview cache limit: {}", config.preview.cache_limit);
    Ok(())
}
