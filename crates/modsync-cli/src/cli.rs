//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

/// modsync - Keep a plugin's module descriptor in line with its host
#[derive(Parser, Debug)]
#[command(name = "modsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (defaults to ./modsync.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tolerate host replacements the plugin does not mirror (forked modules)
    #[arg(long, global = true, env = "MODSYNC_ALLOW_HOST_ONLY_REPLACEMENTS")]
    pub allow_host_only_replacements: bool,

    /// Format of the written mismatch report
    #[arg(long, global = true, value_enum)]
    pub format: Option<ReportFormat>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Report where the plugin disagrees with the host
    ///
    /// Exits 0 when every shared dependency matches. Otherwise prints the
    /// mismatches, writes the report and suggestions files and exits 1.
    ///
    /// Examples:
    ///   modsync compare go.mod host-deps.txt
    ///   modsync compare go.mod host-deps.txt --resolved
    Compare {
        /// Plugin module descriptor
        plugin: PathBuf,

        /// Host descriptor or dependency list
        host: PathBuf,

        /// Compare flattened dependencies instead of whole descriptors
        #[arg(long)]
        resolved: bool,
    },

    /// Merge the host's choices into the plugin descriptor
    ///
    /// Without --output the plugin file is first moved into the backup
    /// directory and the merged descriptor is written in its place.
    Merge {
        /// Plugin module descriptor
        plugin: PathBuf,

        /// Host descriptor or dependency list
        host: PathBuf,

        /// Write the merged descriptor here instead of over the plugin file
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Merge and re-compare until the plugin reconciles
    ///
    /// Each unreconciled pass is written to the backup directory. On
    /// success the plugin file is replaced by the final descriptor.
    Resolve {
        /// Plugin module descriptor
        plugin: PathBuf,

        /// Host descriptor or dependency list
        host: PathBuf,

        /// Maximum number of merge passes (overrides the settings file)
        #[arg(long)]
        attempts: Option<usize>,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   modsync completions bash > ~/.local/share/bash-completion/completions/modsync
    ///   modsync completions zsh > ~/.zfunc/_modsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Serialization used for the report file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Yaml,
}
