//! CLI behaviour tests
//!
//! Every run points `--config` at a missing file inside a temp dir so the
//! user's own configuration never leaks into results.

use super::helpers::setup_snapshot_dir;

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn snapview(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("snapview").unwrap();
    cmd.arg("--config")
        .arg(temp.path().join("config.toml"))
        .env_remove("SNAPVIEW_LOG");
    cmd
}

fn dir_arg(dir: &Path) -> String {
    dir.to_string_lossy().to_string()
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    snapview(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("list"));
}

#[test]
fn list_groups_snapshots() {
    let temp = TempDir::new().unwrap();
    let (dir, _) = setup_snapshot_dir(&temp);

    snapview(&temp)
        .args(["list", "--dir", &dir_arg(&dir)])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example - 4 snapshots"))
        .stdout(predicate::str::contains("  .Main: 3, 2, 1"))
        .stdout(predicate::str::contains("org.other - 1 snapshots"));
}

#[test]
fn list_empty_directory() {
    let temp = TempDir::new().unwrap();
    snapview(&temp)
        .args(["list", "--dir", &dir_arg(&temp.path().join("nothing"))])
        .assert()
        .success()
        .stdout(predicate::str::contains("No snapshots found"));
}

#[test]
fn preview_reports_states_and_releases_everything() {
    let temp = TempDir::new().unwrap();
    let (dir, _) = setup_snapshot_dir(&temp);

    snapview(&temp)
        .args(["preview", "1", "2", "3", "4", "--limit", "2"])
        .args(["--dir", &dir_arg(&dir)])
        .assert()
        .success()
        .stdout(predicate::str::contains("1  evicted"))
        .stdout(predicate::str::contains("2  ready    blob:snapview/2  image/png"))
        .stdout(predicate::str::contains("1080x2400"))
        .stdout(predicate::str::contains("4  error    No preview available"))
        .stdout(predicate::str::contains(
            "Cache: 2/2 previews, 3 loaded, 1 evicted",
        ))
        .stdout(predicate::str::contains(
            "Released 2 previews, 0 live handles remain",
        ));
}

#[test]
fn preview_uses_configured_messages() {
    let temp = TempDir::new().unwrap();
    let (dir, _) = setup_snapshot_dir(&temp);
    std::fs::write(
        temp.path().join("config.toml"),
        "[preview]\nempty_error_text = \"nothing to show\"\n",
    )
    .unwrap();

    snapview(&temp)
        .args(["preview", "5", "--dir", &dir_arg(&dir)])
        .assert()
        .success()
        .stdout(predicate::str::contains("5  error    nothing to show"));
}

#[test]
fn preview_requires_ids() {
    let temp = TempDir::new().unwrap();
    snapview(&temp).arg("preview").assert().failure();
}

#[test]
fn invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "[preview]\nworkers = 0\n").unwrap();

    snapview(&temp)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn status_summarizes_directory() {
    let temp = TempDir::new().unwrap();
    let (dir, _) = setup_snapshot_dir(&temp);

    snapview(&temp)
        .args(["status", "--dir", &dir_arg(&dir)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshots: 5 (4 screenshots"))
        .stdout(predicate::str::contains("Preview cache limit: 20"));
}

#[test]
fn config_show_prints_defaults() {
    let temp = TempDir::new().unwrap();
    snapview(&temp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[preview]"))
        .stdout(predicate::str::contains("cache_limit = 20"));
}

#[test]
fn config_path_echoes_explicit_path() {
    let temp = TempDir::new().unwrap();
    snapview(&temp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
