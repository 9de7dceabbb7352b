//! Merge command implementation

use std::path::Path;

use colored::Colorize;

use modsync_deps::{compare, merge_with_options, render_descriptor};
use modsync_fs::io::{backup_file, write_text};

use super::output::{print_reconciled, print_report, print_written, write_report_files};
use super::{Outcome, load_pair};
use crate::error::Result;
use crate::settings::Settings;

/// Run the merge command
///
/// With `output` the plugin file is left alone. Otherwise it is backed up
/// and overwritten, unless the merge changes nothing.
pub fn run_merge(
    plugin: &Path,
    host: &Path,
    output: Option<&Path>,
    settings: &Settings,
) -> Result<Outcome> {
    println!(
        "{} Merging {} into {}...",
        "=>".blue().bold(),
        host.display(),
        plugin.display()
    );

    let (plugin_descriptor, host_descriptor) = load_pair(plugin, host)?;
    let options = settings.options();
    let merged = merge_with_options(&plugin_descriptor, &host_descriptor, &options);
    let rendered = render_descriptor(&merged);

    match output {
        Some(target) => {
            write_text(target, &rendered)?;
            print_written(target);
        }
        None if merged == plugin_descriptor => {
            println!("{} Plugin descriptor already up to date.", "OK".green().bold());
        }
        None => {
            let backup = backup_file(plugin, &settings.backup_dir)?;
            println!(
                "{} Moved original descriptor to {}",
                "=>".blue().bold(),
                backup.display()
            );
            write_text(plugin, &rendered)?;
            print_written(plugin);
        }
    }

    let report = compare(&merged, &host_descriptor, &options);
    if report.is_empty() {
        print_reconciled();
        return Ok(Outcome::Reconciled);
    }

    print_report(&report);
    write_report_files(&report, settings)?;
    Ok(Outcome::Mismatched)
}
