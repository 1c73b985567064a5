//! CLI definitions for snapview
//!
//! The clap structure lives in the library, separate from main.rs, so it
//! can be inspected by tests and documentation tooling.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build clap styles: green headers and literals, red errors.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "snapview")]
#[command(about = "Browse captured UI snapshots and their preview screenshots")]
#[command(
    long_about = "Snapview - browse captured UI-hierarchy snapshots and their preview screenshots.

Snapshots live in a directory as <id>.json metadata files next to <id>.png
screenshots. Previews are loaded in the background into a bounded cache.

QUICK START:
    snapview list                  Group snapshots by app and activity
    snapview preview 17000 17001   Load previews for two snapshots
    snapview status                Show snapshot storage usage"
)]
#[command(version)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Use this config file instead of ~/.config/snapview/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List snapshots grouped by app package and activity
    List {
        /// Snapshot directory (defaults to [storage].directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Load preview screenshots through the preview cache
    #[command(long_about = "Load preview screenshots through the preview cache.

Every id is requested, outstanding loads are awaited, and the state of each
id is printed: ready (with blob url, type and size), error, or loading.
The cache is torn down afterwards and the number of live handles reported.

EXAMPLES:
    snapview preview 1 2 3             Load three previews
    snapview preview 1 2 3 --limit 2   Keep at most two previews cached")]
    Preview {
        /// Snapshot ids to load, in order
        #[arg(required = true)]
        ids: Vec<u64>,
        /// Snapshot directory (defaults to [storage].directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
        /// Override [preview].cache_limit
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Show snapshot storage statistics
    Status {
        /// Snapshot directory (defaults to [storage].directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
}
