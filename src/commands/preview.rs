//! Preview command handler

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use snapview::preview::{CacheController, PreviewKey};
use snapview::{BlobRegistry, Config};

use super::open_store;

/// Load previews for `ids` and report the state of each.
///
/// Ids are loaded one after another so the cache's recency order follows
/// the argument order.
#[cfg(not(tarpaulin_include))]
pub fn handle(
    config: &Config,
    ids: &[PreviewKey],
    dir: Option<&Path>,
    limit: Option<usize>,
) -> Result<()> {
    let store = open_store(config, dir);
    let mut preview_config = config.preview.clone();
    if let Some(limit) = limit {
        preview_config.cache_limit = limit;
    }
    let timeout = Duration::from_millis(preview_config.settle_timeout_ms);

    let registry = Arc::new(BlobRegistry::new());
    let mut previews = CacheController::new(&preview_config, store, Arc::clone(&registry));

    for &id in ids {
        previews.ensure(id);
        if !previews.settle(timeout) {
            eprintln!("Timed out waiting for preview {}", id);
        }
    }

    for &id in ids {
        println!("{}", describe(&previews, id));
    }

    let stats = previews.stats();
    println!(
        "Cache: {}/{} previews, {} loaded, {} evicted",
        stats.entries, stats.capacity, stats.installs, stats.evictions
    );

    let released = previews.clear();
    drop(previews);
    println!(
        "Released {} previews, {} live handles remain",
        released,
        registry.live()
    );
    Ok(())
}

/// One status line for `id`.
pub fn describe(previews: &CacheController<BlobRegistry>, id: PreviewKey) -> String {
    if let Some(blob) = previews.handle_of(id) {
        let mut line = format!(
            "{}  ready    {}  {}  {}",
            id,
            blob.url,
            blob.mime,
            blob.size_human()
        );
        if let Some((width, height)) = blob.dimensions {
            line.push_str(&format!("  {}x{}", width, height));
        }
        line
    } else if let Some(error) = previews.error_of(id) {
        format!("{}  error    {}", id, error)
    } else if previews.is_loading(id) {
        format!("{}  loading", id)
    } else {
        format!("{}  evicted", id)
    }
}
