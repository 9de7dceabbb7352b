//! modsync CLI
//!
//! Compares a plugin's module descriptor with its host's and merges the
//! host's dependency choices into the plugin.

mod cli;
mod commands;
mod error;
mod settings;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::Outcome;
use error::Result;
use settings::Settings;

fn main() {
    match run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<Outcome> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("{}: tracing subscriber already set", "warning".yellow());
        }
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command.clone() else {
        println!("{} Plugin dependency reconciliation", "modsync".green().bold());
        println!();
        println!("Run {} for available commands.", "modsync --help".cyan());
        return Ok(Outcome::Reconciled);
    };

    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "modsync", &mut std::io::stdout());
        return Ok(Outcome::Reconciled);
    }

    let settings = Settings::load(cli.config.as_deref())?.with_cli(&cli);
    tracing::debug!(?settings, "loaded settings");
    execute_command(command, &settings)
}

fn execute_command(cmd: Commands, settings: &Settings) -> Result<Outcome> {
    match cmd {
        Commands::Compare {
            plugin,
            host,
            resolved,
        } => commands::run_compare(&plugin, &host, resolved, settings),
        Commands::Merge {
            plugin,
            host,
            output,
        } => commands::run_merge(&plugin, &host, output.as_deref(), settings),
        Commands::Resolve {
            plugin,
            host,
            attempts,
        } => commands::run_resolve(&plugin, &host, attempts, settings),
        Commands::Completions { .. } => Ok(Outcome::Reconciled),
    }
}
