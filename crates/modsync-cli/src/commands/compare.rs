//! Compare command implementation

use std::path::Path;

use colored::Colorize;

use modsync_deps::{Report, compare, compare_resolved};

use super::output::{print_reconciled, print_report, write_report_files};
use super::{Outcome, load_pair};
use crate::error::Result;
use crate::settings::Settings;

/// Run the compare command
///
/// Writes the report and suggestions files only when something mismatches.
pub fn run_compare(plugin: &Path, host: &Path, resolved: bool, settings: &Settings) -> Result<Outcome> {
    println!(
        "{} Comparing {} against {}...",
        "=>".blue().bold(),
        plugin.display(),
        host.display()
    );

    let (plugin_descriptor, host_descriptor) = load_pair(plugin, host)?;
    let options = settings.options();

    let report = if resolved {
        compare_resolved(&plugin_descriptor.resolve(), &host_descriptor.resolve(), &options)
            .into_iter()
            .collect::<Report>()
    } else {
        compare(&plugin_descriptor, &host_descriptor, &options)
    };

    if report.is_empty() {
        print_reconciled();
        return Ok(Outcome::Reconciled);
    }

    print_report(&report);
    write_report_files(&report, settings)?;
    Ok(Outcome::Mismatched)
}
