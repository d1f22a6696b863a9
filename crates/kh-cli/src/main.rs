//! k8s-handle CLI
//!
//! Resolves deployment config sections and inspects the result.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Resolve { target, format } => {
            commands::run_resolve(&cli.settings(target), &target.section, *format)
        }
        Commands::Check { target, required } => {
            commands::run_check(&cli.settings(target), &target.section, required)
        }
        Commands::Cluster { target, ca_dir } => {
            commands::run_cluster(&cli.settings(target), &target.section, ca_dir.as_deref())
        }
    }
}
