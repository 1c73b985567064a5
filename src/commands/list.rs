//! List command handler

use anyhow::Result;
use std::path::Path;

use snapview::snapshot::PackageGroup;
use snapview::{group_snapshots, Config};

use super::{open_store, truncate_string};

/// Width activity names are cut to
const ACTIVITY_WIDTH: usize = 48;

/// List snapshots grouped by package and activity.
#[cfg(not(tarpaulin_include))]
pub fn handle(config: &Config, dir: Option<&Path>) -> Result<()> {
    let store = open_store(config, dir);
    let snapshots = store.list_snapshots()?;

    if snapshots.is_empty() {
        println!("No snapshots found in {}.", store.dir().display());
        return Ok(());
    }

    let groups = group_snapshots(&snapshots);
    print!("{}", render(&groups));
    Ok(())
}

/// Render grouped snapshots as an indented tree.
pub fn render(groups: &[PackageGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        if group.app_name == group.package_name {
            out.push_str(&format!(
                "{} - {} snapshots\n",
                group.package_name,
                group.snapshot_count()
            ));
        } else {
            out.push_str(&format!(
                "{} ({}) - {} snapshots\n",
                group.app_name,
                group.package_name,
                group.snapshot_count()
            ));
        }
        for activity in &group.activities {
            let ids: Vec<String> = activity.snapshots.iter().map(|s| s.id.to_string()).collect();
            out.push_str(&format!(
                "  {}: {}\n",
                truncate_string(&activity.activity_id, ACTIVITY_WIDTH),
                ids.join(", ")
            ));
        }
    }
    out
}
