mod cli;
mod cli_utils;
mod commands;
mod config;
mod config_discovery;
mod dep;
mod error;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize structured logging
    logging::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(&args),
        Commands::Cache(args) => commands::cache::run(&args),
    }
}
