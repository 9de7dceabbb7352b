//! Settings file handling
//!
//! Settings come from `--config <path>` or `./modsync.toml` if it exists;
//! command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use modsync_deps::ReconcileOptions;
use modsync_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, ReportFormat};
use crate::error::{CliError, Result};

/// Settings file looked up in the working directory when `--config` is absent.
pub const DEFAULT_SETTINGS_FILE: &str = "modsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub allow_host_only_replacements: bool,
    pub report_file: PathBuf,
    pub suggestions_file: PathBuf,
    pub backup_dir: PathBuf,
    pub merge_attempts: usize,
    pub report_format: ReportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_host_only_replacements: false,
            report_file: PathBuf::from("mismatched_dependencies.json"),
            suggestions_file: PathBuf::from("suggestions"),
            backup_dir: PathBuf::from("tmp"),
            merge_attempts: 1,
            report_format: ReportFormat::Json,
        }
    }
}

impl Settings {
    /// Load settings from `explicit`, or from the default file if present.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let store = ConfigStore::new();
        let settings: Settings = match explicit {
            Some(path) => store.load(path)?,
            None => store
                .load_optional(Path::new(DEFAULT_SETTINGS_FILE))?
                .unwrap_or_default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Apply global flags on top of the loaded settings.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if cli.allow_host_only_replacements {
            self.allow_host_only_replacements = true;
        }
        if let Some(format) = cli.format {
            self.report_format = format;
        }
        self
    }

    pub fn options(&self) -> ReconcileOptions {
        ReconcileOptions::default().allowing_host_only_replacements(self.allow_host_only_replacements)
    }

    fn validate(&self) -> Result<()> {
        if self.merge_attempts == 0 {
            return Err(CliError::user("merge_attempts must be at least 1"));
        }
        Ok(())
    }
}
