//! Resolve command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;

use modsync_deps::{ModuleDescriptor, render_descriptor, resolve};
use modsync_fs::io::{backup_file, numbered_path, write_text};

use super::output::{print_reconciled, print_report, print_written, write_report_files};
use super::{Outcome, load_pair};
use crate::error::{CliError, Result};
use crate::settings::Settings;

/// Subdirectory of the backup directory holding per-pass descriptors.
const PASSES_DIR: &str = "passes";

/// Run the resolve command
///
/// Unreconciled passes are written to `<backup_dir>/passes/<file>-<pass>`.
pub fn run_resolve(
    plugin: &Path,
    host: &Path,
    attempts: Option<usize>,
    settings: &Settings,
) -> Result<Outcome> {
    let attempts = attempts.unwrap_or(settings.merge_attempts);
    if attempts == 0 {
        return Err(CliError::user("--attempts must be at least 1"));
    }

    println!(
        "{} Resolving {} against {} (up to {} passes)...",
        "=>".blue().bold(),
        plugin.display(),
        host.display(),
        attempts
    );

    let (plugin_descriptor, host_descriptor) = load_pair(plugin, host)?;
    let resolution = resolve(&plugin_descriptor, &host_descriptor, attempts, &settings.options());

    let passes_dir = settings.backup_dir.join(PASSES_DIR);
    for (idx, descriptor) in resolution.intermediates.iter().enumerate() {
        write_pass(&passes_dir, plugin, idx + 1, descriptor)?;
    }

    if !resolution.is_reconciled() {
        let last = write_pass(&passes_dir, plugin, resolution.passes, &resolution.descriptor)?;
        println!(
            "{} Still mismatched after {} passes, last attempt in {}",
            "MISMATCH".yellow().bold(),
            resolution.passes,
            last.display()
        );
        print_report(&resolution.report);
        write_report_files(&resolution.report, settings)?;
        return Ok(Outcome::Mismatched);
    }

    if resolution.descriptor != plugin_descriptor {
        let backup = backup_file(plugin, &settings.backup_dir)?;
        println!(
            "{} Moved original descriptor to {}",
            "=>".blue().bold(),
            backup.display()
        );
        write_text(plugin, &render_descriptor(&resolution.descriptor))?;
        print_written(plugin);
    }

    print_reconciled();
    tracing::info!(passes = resolution.passes, "resolved");
    Ok(Outcome::Reconciled)
}

fn write_pass(
    dir: &Path,
    plugin: &Path,
    pass: usize,
    descriptor: &ModuleDescriptor,
) -> Result<PathBuf> {
    let path = numbered_path(dir, plugin, pass);
    write_text(&path, &render_descriptor(descriptor))?;
    tracing::debug!(pass, path = %path.display(), "wrote pass descriptor");
    Ok(path)
}
