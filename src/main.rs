//! Snapview - CLI entry point

mod commands;

use anyhow::Result;
use clap::Parser;

use snapview::cli::{Cli, Commands, ConfigCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    // A second subscriber can only come from embedding; logging is optional.
    let _ = snapview::logging::init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List { dir } => commands::list::handle(&config, dir.as_deref()),
        Commands::Preview { ids, dir, limit } => {
            commands::preview::handle(&config, &ids, dir.as_deref(), limit)
        }
        Commands::Status { dir } => commands::status::handle(&config, dir.as_deref()),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config),
            ConfigCommands::Path => commands::config::handle_path(cli.config.as_deref()),
        },
    }
}
