//! Terminal output and report files shared by the commands

use std::path::Path;

use colored::Colorize;

use modsync_deps::{MismatchEntry, Report, render_suggestions};
use modsync_fs::io::write_text;

use crate::cli::ReportFormat;
use crate::error::Result;
use crate::settings::Settings;

pub fn print_reconciled() {
    println!("{} All shared dependencies match.", "OK".green().bold());
}

pub fn print_report(report: &Report) {
    println!(
        "{} {} mismatched dependencies:",
        "MISMATCH".yellow().bold(),
        report.len()
    );
    println!("   {}", kind_summary(report).dimmed());
    for entry in report.entries() {
        print_entry(entry);
    }
}

/// `kind: count` pairs in kind order, e.g. `replace-mismatch: 1, require-version-mismatch: 2`.
fn kind_summary(report: &Report) -> String {
    report
        .counts()
        .iter()
        .map(|(kind, count)| format!("{kind}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_entry(entry: &MismatchEntry) {
    println!(
        "   {} {} ({})",
        "!".red(),
        entry.module.cyan(),
        entry.kind.to_string().dimmed()
    );
    println!("     {}", entry.message);
}

/// Serialize `report` in the configured format.
pub fn render_report(report: &Report, format: ReportFormat) -> Result<String> {
    let content = match format {
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Yaml => report.to_yaml()?,
    };
    Ok(content)
}

/// Write the report file and, when there is something to suggest, the
/// suggestions file.
pub fn write_report_files(report: &Report, settings: &Settings) -> Result<()> {
    let content = render_report(report, settings.report_format)?;
    write_text(&settings.report_file, &content)?;
    println!(
        "{} Wrote mismatch report to {}",
        "=>".blue().bold(),
        settings.report_file.display()
    );

    if let Some(suggestions) = render_suggestions(report) {
        write_text(&settings.suggestions_file, &suggestions)?;
        println!(
            "{} Wrote suggestions to {}, use its content to update your module file",
            "=>".blue().bold(),
            settings.suggestions_file.display()
        );
    }
    Ok(())
}

pub fn print_written(path: &Path) {
    println!("{} Wrote {}", "OK".green().bold(), path.display());
}
