//! Unit tests for storage and snapshot grouping

use super::helpers::{setup_snapshot_dir, snapshot};

use snapview::group_snapshots;
use snapview::preview::PreviewLoader;
use tempfile::TempDir;

#[test]
fn list_all_snapshots() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);

    let snapshots = store.list_snapshots().unwrap();
    let ids: Vec<_> = snapshots.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn stats_count_screenshots() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);

    let stats = store.get_stats().unwrap();
    assert_eq!(stats.snapshot_count, 5);
    assert_eq!(stats.screenshot_count, 4);
}

#[test]
fn grouped_listing_orders_packages_and_activities() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);

    let groups = group_snapshots(&store.list_snapshots().unwrap());
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].package_name, "com.example");
    assert_eq!(groups[0].activities.len(), 2);
    assert_eq!(groups[0].activities[0].activity_id, ".Main");
    let main_ids: Vec<_> = groups[0].activities[0]
        .snapshots
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(main_ids, vec![3, 2, 1]);
    assert_eq!(groups[1].package_name, "org.other");
}

#[test]
fn legacy_metadata_is_normalized_on_read() {
    let temp = TempDir::new().unwrap();
    let (dir, store) = setup_snapshot_dir(&temp);
    std::fs::write(
        dir.join("9.json"),
        r#"{"id": 9, "appInfo": {"id": "com.legacy", "name": "Legacy"}}"#,
    )
    .unwrap();

    let meta = store.snapshot(9).unwrap();
    assert_eq!(meta.app_id, "com.legacy");
    assert_eq!(meta.activity_id, "(unknown)");
}

#[test]
fn store_is_a_preview_loader() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);

    assert!(store.load(1).unwrap().is_some());
    assert!(store.load(4).unwrap().is_none());
    assert!(store.load(5).unwrap().is_none());
}

#[test]
fn saved_snapshot_roundtrips_through_json() {
    let temp = TempDir::new().unwrap();
    let (_, store) = setup_snapshot_dir(&temp);
    let mut meta = snapshot(42, "com.example", ".Detail");
    meta.import_time = Some(1_700_000_000_000);
    store.save(&meta, None).unwrap();

    assert_eq!(store.snapshot(42).unwrap(), meta);
}
