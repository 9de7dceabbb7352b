//! Text output: descriptor files and remediation suggestions.

use std::fmt::Write as _;

use crate::descriptor::ModuleDescriptor;
use crate::report::{MismatchKind, Report};

/// Render `descriptor` in the sectioned grammar.
///
/// Entries are written from their stored raw lines, sorted by module path.
/// Sections the descriptor does not have are left out entirely. An unnamed
/// descriptor is written as `module ""` so the text still parses back.
pub fn render_descriptor(descriptor: &ModuleDescriptor) -> String {
    let mut out = String::new();
    if descriptor.name.is_empty() {
        out.push_str("module \"\"\n");
    } else {
        let _ = writeln!(out, "module {}", descriptor.name);
    }

    if let Some(version) = &descriptor.tool_version {
        let _ = writeln!(out, "\ngo {version}");
    }

    if descriptor.requirements.is_some() {
        write_block(
            &mut out,
            "require",
            None,
            descriptor.requirement_entries().map(|r| r.line.as_str()),
        );
    }
    if descriptor.replacements.is_some() {
        write_block(
            &mut out,
            "replace",
            None,
            descriptor.replacement_entries().map(|d| d.line.as_str()),
        );
    }

    out
}

/// Render the host entries a plugin should adopt, or `None` if the report
/// has nothing to suggest.
pub fn render_suggestions(report: &Report) -> Option<String> {
    let mut requires = Vec::new();
    let mut replaces = Vec::new();

    for entry in report.entries() {
        let host = &entry.host_side;
        match entry.kind {
            MismatchKind::RequireVersionMismatch | MismatchKind::PluginHasReplacementHostDoesNot => {
                if let (false, Some(version)) = (host.is_replaced(), &host.version) {
                    requires.push(format!("{} {}", host.name, version));
                }
            }
            MismatchKind::HostHasReplacementPluginDoesNot
            | MismatchKind::ReplaceMismatch
            | MismatchKind::ReplaceNameMismatch => {
                if host.is_replaced() {
                    replaces.push(host.to_string());
                }
            }
            MismatchKind::Ok | MismatchKind::Internal => {}
        }
    }

    if requires.is_empty() && replaces.is_empty() {
        return None;
    }

    let mut out = String::new();
    if !requires.is_empty() {
        write_block(
            &mut out,
            "require",
            Some("Add the following entries to the 'require' section of your module file:"),
            requires.iter().map(String::as_str),
        );
    }
    if !replaces.is_empty() {
        write_block(
            &mut out,
            "replace",
            Some("Add the following entries to the 'replace' section of your module file:"),
            replaces.iter().map(String::as_str),
        );
    }
    Some(out.trim_start().to_string())
}

fn write_block<'a>(
    out: &mut String,
    keyword: &str,
    comment: Option<&str>,
    lines: impl Iterator<Item = &'a str>,
) {
    let _ = writeln!(out, "\n{keyword} (");
    if let Some(comment) = comment {
        let _ = writeln!(out, "\t// {comment}");
    }
    for line in lines {
        let _ = writeln!(out, "\t{line}");
    }
    out.push_str(")\n");
}
