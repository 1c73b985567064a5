//! Snapshot metadata, normalization and package/activity grouping

use serde::{Deserialize, Serialize};

use crate::preview::PreviewKey;

/// Placeholder for a missing package or activity name
pub const UNKNOWN: &str = "(unknown)";

/// Application information captured with a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Metadata of one captured snapshot.
///
/// Unknown fields in the stored JSON (the node tree, device info) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub id: PreviewKey,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub activity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_info: Option<AppInfo>,
    /// Import time in milliseconds, when the snapshot was imported rather than captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_time: Option<u64>,
}

impl SnapshotMeta {
    /// Package name used for grouping
    pub fn package_name(&self) -> &str {
        if !self.app_id.is_empty() {
            return &self.app_id;
        }
        match &self.app_info {
            Some(info) if !info.id.is_empty() => &info.id,
            _ => UNKNOWN,
        }
    }

    /// Activity name used for grouping
    pub fn activity_name(&self) -> &str {
        if self.activity_id.is_empty() {
            UNKNOWN
        } else {
            &self.activity_id
        }
    }

    /// Display name of the app, if one was captured
    pub fn app_name(&self) -> Option<&str> {
        self.app_info
            .as_ref()
            .map(|info| info.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Sort key for newest-first ordering
    fn recency(&self) -> u64 {
        self.import_time.unwrap_or(self.id)
    }
}

/// Fill in fields older snapshots are missing.
///
/// The app id falls back to `app_info.id`; `app_info.id` is back-filled from
/// the app id; an empty activity id becomes `(unknown)`.
pub fn normalize(mut meta: SnapshotMeta) -> SnapshotMeta {
    if meta.app_id.is_empty() {
        if let Some(info) = &meta.app_info {
            meta.app_id = info.id.clone();
        }
    }
    if let Some(info) = meta.app_info.as_mut() {
        if info.id.is_empty() {
            info.id = meta.app_id.clone();
        }
    }
    if meta.activity_id.is_empty() {
        meta.activity_id = UNKNOWN.to_string();
    }
    meta
}

/// Snapshots of one activity, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityGroup {
    pub activity_id: String,
    pub snapshots: Vec<SnapshotMeta>,
}

/// Activities of one package, busiest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageGroup {
    pub package_name: String,
    pub app_name: String,
    pub activities: Vec<ActivityGroup>,
}

impl PackageGroup {
    pub fn snapshot_count(&self) -> usize {
        self.activities.iter().map(|a| a.snapshots.len()).sum()
    }
}

/// Group snapshots by package, then activity.
///
/// Packages are ordered by activity count and activities by snapshot count,
/// both descending; ties keep first-seen order.
pub fn group_snapshots(snapshots: &[SnapshotMeta]) -> Vec<PackageGroup> {
    let mut packages: Vec<PackageGroup> = Vec::new();

    for snapshot in snapshots {
        let package_name = snapshot.package_name();
        let index = match packages.iter().position(|p| p.package_name == package_name) {
            Some(index) => index,
            None => {
                packages.push(PackageGroup {
                    package_name: package_name.to_string(),
                    app_name: String::new(),
                    activities: Vec::new(),
                });
                packages.len() - 1
            }
        };
        let package = &mut packages[index];

        if package.app_name.is_empty() {
            if let Some(name) = snapshot.app_name() {
                package.app_name = name.to_string();
            }
        }

        let activity_id = snapshot.activity_name();
        match package
            .activities
            .iter_mut()
            .find(|a| a.activity_id == activity_id)
        {
            Some(activity) => activity.snapshots.push(snapshot.clone()),
            None => package.activities.push(ActivityGroup {
                activity_id: activity_id.to_string(),
                snapshots: vec![snapshot.clone()],
            }),
        }
    }

    for package in &mut packages {
        if package.app_name.is_empty() {
            package.app_name = package.package_name.clone();
        }
        for activity in &mut package.activities {
            activity
                .snapshots
                .sort_by(|a, b| b.recency().cmp(&a.recency()));
        }
        package
            .activities
            .sort_by(|a, b| b.snapshots.len().cmp(&a.snapshots.len()));
    }
    packages.sort_by(|a, b| b.activities.len().cmp(&a.activities.len()));
    packages
}
