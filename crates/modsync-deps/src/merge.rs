//! Merging a plugin descriptor toward its host.
//!
//! The merger never touches its inputs; it clones the plugin's sections,
//! applies the host's choices and returns a new descriptor. The plugin's
//! name and tool version are always kept.
//!
//! Precedence, per module the plugin declares:
//!
//! - host plain requirement: the host version wins and any plugin
//!   replacement of that module is dropped;
//! - host replacement of a module the plugin only requires: the host
//!   directive is added (unless host-only replacements are tolerated);
//! - host replacement of a module the plugin also replaces: the host
//!   directive wins only when the plugin pinned a left-hand version.
//!
//! Entries that already agree with the host are left as written, so a
//! descriptor the comparator accepts merges to itself.

use crate::compare::compare;
use crate::descriptor::ModuleDescriptor;
use crate::options::ReconcileOptions;
use crate::report::Report;

/// Merge with the default policy.
pub fn merge(plugin: &ModuleDescriptor, host: &ModuleDescriptor) -> ModuleDescriptor {
    merge_with_options(plugin, host, &ReconcileOptions::default())
}

/// Merge `plugin` toward `host`, returning a new descriptor.
pub fn merge_with_options(
    plugin: &ModuleDescriptor,
    host: &ModuleDescriptor,
    options: &ReconcileOptions,
) -> ModuleDescriptor {
    let mut requirements = plugin.requirements.clone().unwrap_or_default();
    let mut replacements = plugin.replacements.clone().unwrap_or_default();

    for requirement in plugin.requirement_entries() {
        let module = &requirement.path;

        if let Some(host_requirement) = host.plain_requirement(module) {
            if host_requirement.version != requirement.version {
                tracing::debug!(
                    module = %module,
                    from = %requirement.version,
                    to = %host_requirement.version,
                    "taking host requirement"
                );
                requirements.insert(module.clone(), host_requirement.clone());
            }
            if replacements.remove(module).is_some() {
                tracing::debug!(module = %module, "dropping plugin replacement of host requirement");
            }
            continue;
        }

        if plugin.replacement(module).is_some() || options.allow_host_only_replacements {
            continue;
        }
        if let Some(host_directive) = host.replacement(module) {
            tracing::debug!(module = %module, directive = %host_directive, "adding host replacement");
            replacements.insert(module.clone(), host_directive.clone());
        }
    }

    for directive in plugin.replacement_entries() {
        let module = &directive.old.path;

        if let Some(host_requirement) = host.plain_requirement(module) {
            replacements.remove(module);
            let already_pinned = plugin
                .requirement(module)
                .is_some_and(|r| r.version == host_requirement.version);
            if !already_pinned {
                tracing::debug!(module = %module, "replacing plugin replacement with host requirement");
                requirements.insert(module.clone(), host_requirement.clone());
            }
            continue;
        }

        if let Some(host_directive) = host.replacement(module) {
            if directive.old.version.is_some() && !directive.same_target(host_directive) {
                tracing::debug!(module = %module, directive = %host_directive, "taking host replacement");
                replacements.insert(module.clone(), host_directive.clone());
            }
        }
    }

    ModuleDescriptor {
        name: plugin.name.clone(),
        tool_version: plugin.tool_version.clone(),
        requirements: Some(requirements),
        replacements: Some(replacements),
    }
    .normalized()
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Descriptor after the last merge pass.
    pub descriptor: ModuleDescriptor,
    /// Mismatches still left in `descriptor`.
    pub report: Report,
    /// Number of merge passes run.
    pub passes: usize,
    /// Merged descriptors of the passes that did not reconcile, in order.
    pub intermediates: Vec<ModuleDescriptor>,
}

impl Resolution {
    pub fn is_reconciled(&self) -> bool {
        self.report.is_empty()
    }
}

/// Merge and re-compare up to `attempts` times (at least once).
///
/// Stops early when the descriptor reconciles or when a pass changes
/// nothing.
pub fn resolve(
    plugin: &ModuleDescriptor,
    host: &ModuleDescriptor,
    attempts: usize,
    options: &ReconcileOptions,
) -> Resolution {
    let attempts = attempts.max(1);
    let mut current = plugin.clone();
    let mut intermediates = Vec::new();
    let mut passes = 0;

    loop {
        passes += 1;
        let merged = merge_with_options(&current, host, options);
        let report = compare(&merged, host, options);
        let stalled = merged == current;
        tracing::debug!(pass = passes, mismatches = report.len(), stalled, "merge pass");

        if report.is_empty() || stalled || passes >= attempts {
            return Resolution {
                descriptor: merged,
                report,
                passes,
                intermediates,
            };
        }

        intermediates.push(merged.clone());
        current = merged;
    }
}
