//! Preview cache tests against a real snapshot directory

use super::helpers::setup_snapshot_dir;

use snapview::config::PreviewConfig;
use snapview::{BlobRegistry, CacheController, CacheLimit, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(5);

fn previews(
    store: SnapshotStore,
    limit: usize,
) -> (CacheController<BlobRegistry>, Arc<BlobRegistry>) {
    let config = PreviewConfig {
        cache_limit: limit,
        ..PreviewConfig::default()
    };
    let registry = Arc::new(BlobRegistry::new());
    let controller = CacheController::new(&config, store, Arc::clone(&registry));
    (controller, registry)
}

#[test]
fn loads_screenshot_into_blob() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);
    let (mut previews, registry) = previews(store, 5);

    previews.ensure(1);
    assert!(previews.settle(WAIT));

    let blob = previews.handle_of(1).unwrap();
    assert_eq!(blob.mime, "image/png");
    assert_eq!(blob.dimensions, Some((1080, 2400)));
    assert_eq!(registry.live(), 1);
    assert_eq!(registry.bytes(&blob.url).unwrap().len(), blob.size);
}

#[test]
fn empty_and_missing_screenshots_record_empty_message() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);
    let (mut previews, registry) = previews(store, 5);

    previews.ensure_all(&[4, 5]);
    assert!(previews.settle(WAIT));

    assert_eq!(previews.error_of(4), Some("No preview available"));
    assert_eq!(previews.error_of(5), Some("No preview available"));
    assert!(previews.handle_of(4).is_none());
    assert_eq!(registry.live(), 0);
}

#[test]
fn unreadable_screenshot_records_failure_and_retries() {
    let temp = TempDir::new().unwrap();
    let (dir, store) = setup_snapshot_dir(&temp);
    let shot = dir.join("5.png");
    std::fs::create_dir_all(&shot).unwrap();
    let (mut previews, _) = previews(store, 5);

    previews.ensure(5);
    assert!(previews.settle(WAIT));
    assert_eq!(previews.error_of(5), Some("Failed to load preview"));

    std::fs::remove_dir(&shot).unwrap();
    std::fs::write(&shot, super::helpers::png_bytes(4, 4)).unwrap();
    previews.ensure(5);
    assert!(previews.settle(WAIT));
    assert!(previews.error_of(5).is_none());
    assert_eq!(previews.handle_of(5).unwrap().dimensions, Some((4, 4)));
}

#[test]
fn concurrent_loads_respect_capacity() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);
    let (mut previews, registry) = previews(store, 2);

    previews.ensure_all(&[1, 2, 3]);
    assert!(previews.settle(WAIT));

    // completion order is not fixed, only the bound is
    assert_eq!(previews.keys().len(), 2);
    assert_eq!(registry.live(), 2);
    assert_eq!(registry.revoked(), 1);
}

#[test]
fn sequential_loads_evict_least_recent() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);
    let (mut previews, registry) = previews(store, 2);

    for id in [1, 2, 3] {
        previews.ensure(id);
        assert!(previews.settle(WAIT));
    }
    assert_eq!(previews.keys(), vec![2, 3]);
    assert!(previews.handle_of(1).is_none());
    assert_eq!(registry.live(), 2);
}

#[test]
fn live_limit_shrink_releases_blobs() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);
    let (mut previews, registry) = previews(store, 3);
    let limit = CacheLimit::new(3);
    previews.watch_capacity(limit.clone());

    for id in [1, 2, 3] {
        previews.ensure(id);
        assert!(previews.settle(WAIT));
    }
    limit.set(1);
    previews.poll();

    assert_eq!(previews.keys(), vec![3]);
    assert_eq!(registry.live(), 1);
    assert_eq!(registry.revoked(), 2);
}

#[test]
fn teardown_leaves_no_live_blobs() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);
    let (mut previews, registry) = previews(store, 10);

    previews.ensure_all(&[1, 2, 3, 4, 5]);
    assert!(previews.settle(WAIT));
    assert_eq!(registry.live(), 3);

    drop(previews);
    assert_eq!(registry.live(), 0);
    assert_eq!(registry.revoked(), 3);
}
