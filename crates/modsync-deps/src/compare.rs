//! Mismatch classification between a plugin and its host.
//!
//! Two levels are offered. [`compare_resolved`] works on flattened
//! [`DependencyInfo`] maps and only looks at modules both sides declare.
//! [`compare`] works on whole descriptors, distinguishes more kinds and
//! walks three passes whose order decides which classification a module
//! gets when several apply:
//!
//! 1. plugin requirements that the plugin does not replace,
//! 2. plugin replacements of modules the host only requires,
//! 3. host replacements of modules the plugin declares.

use std::collections::BTreeMap;

use crate::descriptor::{DependencyInfo, ModuleDescriptor};
use crate::error::{Error, Result};
use crate::options::ReconcileOptions;
use crate::report::{MismatchEntry, MismatchKind, Report};

/// Classify one module declared by both sides.
///
/// # Errors
///
/// Returns [`Error::InternalMismatchClassification`] when the two entries
/// are not about the same module.
pub fn classify(
    plugin: &DependencyInfo,
    host: &DependencyInfo,
    options: &ReconcileOptions,
) -> Result<MismatchKind> {
    if plugin.name != host.name {
        return Err(Error::InternalMismatchClassification {
            module: format!("{} / {}", plugin.name, host.name),
        });
    }

    let kind = match (&host.replacement, &plugin.replacement) {
        (None, None) if host.version == plugin.version => MismatchKind::Ok,
        (None, None) => MismatchKind::RequireVersionMismatch,
        (Some(_), None) if options.allow_host_only_replacements => MismatchKind::Ok,
        (Some(_), None) => MismatchKind::HostHasReplacementPluginDoesNot,
        (None, Some(_)) => MismatchKind::PluginHasReplacementHostDoesNot,
        (Some(h), Some(p)) if h == p => MismatchKind::Ok,
        (Some(_), Some(_)) => MismatchKind::ReplaceMismatch,
    };
    Ok(kind)
}

/// Compare flattened dependency maps, reporting only shared modules.
///
/// Entries come back in module-path order.
pub fn compare_resolved(
    plugin: &BTreeMap<String, DependencyInfo>,
    host: &BTreeMap<String, DependencyInfo>,
    options: &ReconcileOptions,
) -> Vec<MismatchEntry> {
    let mut mismatches = Vec::new();

    for (name, plugin_dep) in plugin {
        let Some(host_dep) = host.get(name) else {
            continue;
        };

        let kind = classify(plugin_dep, host_dep, options).unwrap_or_else(|e| {
            tracing::error!(module = %name, error = %e, "could not classify dependency");
            MismatchKind::Internal
        });
        if kind.is_ok() {
            continue;
        }

        let (plugin_value, host_value) = describe(kind, plugin_dep, host_dep);
        mismatches.push(MismatchEntry::new(
            kind,
            name.as_str(),
            &plugin_value,
            &host_value,
            plugin_dep.clone(),
            host_dep.clone(),
        ));
    }

    mismatches
}

/// Values quoted in the remediation message for `kind`.
fn describe(kind: MismatchKind, plugin: &DependencyInfo, host: &DependencyInfo) -> (String, String) {
    match kind {
        MismatchKind::RequireVersionMismatch => {
            (plugin.version_str().to_string(), host.version_str().to_string())
        }
        MismatchKind::HostHasReplacementPluginDoesNot => (
            plugin.to_string(),
            host.replacement
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        MismatchKind::PluginHasReplacementHostDoesNot => {
            (plugin.to_string(), host.version_str().to_string())
        }
        _ => (plugin.to_string(), host.to_string()),
    }
}

/// Compare two descriptors, producing at most one entry per module.
pub fn compare(
    plugin: &ModuleDescriptor,
    host: &ModuleDescriptor,
    options: &ReconcileOptions,
) -> Report {
    let plugin_resolved = plugin.resolve();
    let host_resolved = host.resolve();
    let side = |map: &BTreeMap<String, DependencyInfo>, module: &str| {
        map.get(module)
            .cloned()
            .unwrap_or_else(|| DependencyInfo::bare(module))
    };
    let mut report = Report::new();

    for requirement in plugin.requirement_entries() {
        let module = requirement.path.as_str();
        if plugin.replacement(module).is_some() {
            continue;
        }

        let kind = if let Some(host_directive) = host.replacement(module) {
            if options.allow_host_only_replacements {
                continue;
            }
            if host_directive.new.path != module {
                Some((MismatchKind::ReplaceNameMismatch, host_directive.new.path.clone()))
            } else if host_directive.new.version.as_deref() != Some(requirement.version.as_str()) {
                Some((
                    MismatchKind::HostHasReplacementPluginDoesNot,
                    host_directive.new.to_string(),
                ))
            } else {
                None
            }
        } else if let Some(host_requirement) = host.requirement(module) {
            (host_requirement.version != requirement.version).then(|| {
                (
                    MismatchKind::RequireVersionMismatch,
                    host_requirement.version.clone(),
                )
            })
        } else {
            None
        };

        if let Some((kind, host_value)) = kind {
            report.insert(MismatchEntry::new(
                kind,
                module,
                &requirement.version,
                &host_value,
                side(&plugin_resolved, module),
                side(&host_resolved, module),
            ));
        }
    }

    for directive in plugin.replacement_entries() {
        let module = directive.old.path.as_str();
        if let Some(host_requirement) = host.plain_requirement(module) {
            report.insert(MismatchEntry::new(
                MismatchKind::PluginHasReplacementHostDoesNot,
                module,
                &directive.to_string(),
                &host_requirement.version,
                side(&plugin_resolved, module),
                side(&host_resolved, module),
            ));
        }
    }

    for host_directive in host.replacement_entries() {
        let module = host_directive.old.path.as_str();
        if !plugin.declares(module) {
            continue;
        }

        match plugin.replacement(module) {
            None if options.allow_host_only_replacements => {}
            None => {
                let plugin_side = side(&plugin_resolved, module);
                report.insert(MismatchEntry::new(
                    MismatchKind::HostHasReplacementPluginDoesNot,
                    module,
                    &plugin_side.to_string(),
                    &host_directive.new.to_string(),
                    plugin_side,
                    side(&host_resolved, module),
                ));
            }
            Some(directive) if !directive.same_target(host_directive) => {
                report.insert(MismatchEntry::new(
                    MismatchKind::ReplaceMismatch,
                    module,
                    &directive.to_string(),
                    &host_directive.to_string(),
                    side(&plugin_resolved, module),
                    side(&host_resolved, module),
                ));
            }
            Some(_) => {}
        }
    }

    tracing::debug!(mismatches = report.len(), "compared descriptors");
    report
}
