//! Mismatch taxonomy and the per-module report container.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::DependencyInfo;
use crate::error::{Error, Result};

/// Classification of one shared module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MismatchKind {
    /// Both sides agree.
    Ok,
    /// Both sides require the module at different versions.
    RequireVersionMismatch,
    /// The host replaces the module and the plugin does not.
    HostHasReplacementPluginDoesNot,
    /// The plugin replaces a module the host only requires.
    PluginHasReplacementHostDoesNot,
    /// Both sides replace the module with different targets.
    ReplaceMismatch,
    /// The host replaces a module the plugin requires with a differently named one.
    ReplaceNameMismatch,
    /// The comparator could not classify the pair.
    Internal,
}

impl MismatchKind {
    pub fn is_ok(self) -> bool {
        self == MismatchKind::Ok
    }

    /// Remediation text for this kind.
    ///
    /// `plugin_value` and `host_value` are whatever each side declares for
    /// `module` (a version, a replacement target or a full directive).
    pub fn message(self, module: &str, plugin_value: &str, host_value: &str) -> String {
        match self {
            MismatchKind::Ok => String::new(),
            MismatchKind::RequireVersionMismatch => format!(
                "your plugin requires the [{module}] module with version [{plugin_value}], \
                 but the host requires that module with version [{host_value}]. \
                 Please pin your dependency to the same version as the host one using a [require] clause"
            ),
            MismatchKind::HostHasReplacementPluginDoesNot => format!(
                "the host defines a replacement for the [{module}] module but your plugin does not \
                 (your plugin has [{plugin_value}]). Please add a [replace] clause to your module file \
                 replacing the module with [{host_value}]"
            ),
            MismatchKind::PluginHasReplacementHostDoesNot => format!(
                "your plugin defines a replacement for the [{module}] module ([{plugin_value}]), \
                 but the host has a [require] entry for the same module with version [{host_value}] \
                 and no [replace] for it. Please remove the [replace] clause and pin your dependency \
                 to the same version as the host one using a [require] clause"
            ),
            MismatchKind::ReplaceMismatch => format!(
                "the host defines a replacement for the [{module}] module that does not match the \
                 replacement in your plugin. The plugin [replace] clause must match the host one. \
                 Your plugin has: [{plugin_value}], the host has: [{host_value}]"
            ),
            MismatchKind::ReplaceNameMismatch => format!(
                "your plugin requires the [{module}] module, but the host replaces that module with \
                 one named [{host_value}]. Please add a [replace] clause to your module file to match \
                 the host one"
            ),
            MismatchKind::Internal => format!(
                "internal error classifying the [{module}] module (plugin: [{plugin_value}], host: [{host_value}])"
            ),
        }
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MismatchKind::Ok => "ok",
            MismatchKind::RequireVersionMismatch => "require-version-mismatch",
            MismatchKind::HostHasReplacementPluginDoesNot => "host-has-replacement-plugin-does-not",
            MismatchKind::PluginHasReplacementHostDoesNot => "plugin-has-replacement-host-does-not",
            MismatchKind::ReplaceMismatch => "replace-mismatch",
            MismatchKind::ReplaceNameMismatch => "replace-name-mismatch",
            MismatchKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// One reported module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MismatchEntry {
    pub module: String,
    pub kind: MismatchKind,
    pub message: String,
    #[serde(rename = "pluginDependency")]
    pub plugin_side: DependencyInfo,
    #[serde(rename = "hostDependency")]
    pub host_side: DependencyInfo,
}

impl MismatchEntry {
    /// Build an entry, deriving the message from the kind and both sides.
    pub fn new(
        kind: MismatchKind,
        module: impl Into<String>,
        plugin_value: &str,
        host_value: &str,
        plugin_side: DependencyInfo,
        host_side: DependencyInfo,
    ) -> Self {
        let module = module.into();
        Self {
            message: kind.message(&module, plugin_value, host_value),
            module,
            kind,
            plugin_side,
            host_side,
        }
    }
}

/// Mismatches keyed by module path, at most one per module.
///
/// The first entry added for a module is authoritative; callers order their
/// checks so the most specific classification is recorded first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: BTreeMap<String, MismatchEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mismatch with no dependency detail. No-op if `module` is
    /// already reported; returns whether the entry was added.
    pub fn add_entry(
        &mut self,
        kind: MismatchKind,
        module: impl Into<String>,
        message: impl Into<String>,
    ) -> bool {
        let module = module.into();
        let entry = MismatchEntry {
            plugin_side: DependencyInfo::bare(&module),
            host_side: DependencyInfo::bare(&module),
            module,
            kind,
            message: message.into(),
        };
        self.insert(entry)
    }

    /// Record a full entry. No-op if its module is already reported.
    pub fn insert(&mut self, entry: MismatchEntry) -> bool {
        if self.entries.contains_key(&entry.module) {
            tracing::debug!(
                module = %entry.module,
                kind = %entry.kind,
                "module already reported, keeping first classification"
            );
            return false;
        }
        self.entries.insert(entry.module.clone(), entry);
        true
    }

    pub fn get_entry(&self, module: &str) -> Option<&MismatchEntry> {
        self.entries.get(module)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in module-path order.
    pub fn entries(&self) -> impl Iterator<Item = &MismatchEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> Vec<MismatchEntry> {
        self.entries.into_values().collect()
    }

    /// Count of entries per kind.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.values() {
            *counts.entry(entry.kind.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::ReportSerialize(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ReportSerialize(e.to_string()))
    }
}

impl FromIterator<MismatchEntry> for Report {
    fn from_iter<I: IntoIterator<Item = MismatchEntry>>(iter: I) -> Self {
        let mut report = Report::new();
        for entry in iter {
            report.insert(entry);
        }
        report
    }
}

impl Serialize for Report {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.values())
    }
}

impl<'de> Deserialize<'de> for Report {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let entries = Vec::<MismatchEntry>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
