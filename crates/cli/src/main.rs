#![forbid(unsafe_code)]

mod commands;
mod config;
mod logging;
mod render;

use clap::Parser;
use commands::Command;
use config::{CliConfig, GlobalArgs};

/// Track practice hours against a goal date.
#[derive(Parser, Debug)]
#[command(name = "goalsheet", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = CliConfig::resolve(&cli.global);
    logging::init(&config.log_filter);
    tracing::debug!(
        storage_dir = %config.storage_dir.display(),
        offset = %config.calendar.offset(),
        "resolved config"
    );
    commands::run(cli.command, &config)
}
