//! libman CLI
//!
//! Installs libraries from a catalog, a local archive or a git repository.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use libman_core::Settings;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} failed to set up logging: {e}", "warning:".yellow().bold());
    }

    let settings = match cli.config.or_else(Settings::default_path) {
        Some(path) => Settings::load(&path)?,
        None => Settings::default(),
    };
    tracing::debug!(?settings, "Using settings");

    match cli.command {
        Commands::Install(args) => commands::run_install(&settings, args, cli.verbose),
        Commands::List => commands::run_list(&settings),
        Commands::Deps(args) => commands::run_deps(&settings, &args),
    }
}
