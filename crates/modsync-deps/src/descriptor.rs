//! In-memory model of a module descriptor.
//!
//! A [`ModuleDescriptor`] holds the module identity, its tool version and two
//! maps keyed by module path: plain requirements and replacement directives.
//! Each entry keeps the raw line it was parsed from so a descriptor renders
//! back to the same text. [`ModuleDescriptor::resolve`] flattens both maps
//! into one [`DependencyInfo`] per module, with replacements taking
//! precedence over requirements.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A module path with an optional version.
///
/// The version is absent for the left-hand side of an unpinned replace
/// directive and for local-path replacement targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleRef {
    pub path: String,
    pub version: Option<String>,
}

impl ModuleRef {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: Some(version.into()),
        }
    }

    pub fn unversioned(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: None,
        }
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.path, version),
            None => f.write_str(&self.path),
        }
    }
}

/// A plain `require` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    /// Trimmed source line, trailing comments included.
    pub line: String,
}

impl Requirement {
    /// Build a requirement whose raw line is `path version`.
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        let path = path.into();
        let version = version.into();
        let line = format!("{} {}", path, version);
        Self {
            path,
            version,
            line,
        }
    }
}

/// A `replace old [v] => new [v]` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceDirective {
    pub old: ModuleRef,
    pub new: ModuleRef,
    /// Trimmed source line, trailing comments included.
    pub line: String,
}

impl ReplaceDirective {
    /// Build a directive whose raw line is `old => new`.
    pub fn new(old: ModuleRef, new: ModuleRef) -> Self {
        let line = format!("{} => {}", old, new);
        Self { old, new, line }
    }

    /// Whether both directives substitute the same target.
    pub fn same_target(&self, other: &ReplaceDirective) -> bool {
        self.new == other.new
    }
}

impl fmt::Display for ReplaceDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.old, self.new)
    }
}

/// One resolved dependency: a module and, if it is replaced, its substitute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DependencyRecord", from = "DependencyRecord")]
pub struct DependencyInfo {
    pub name: String,
    pub version: Option<String>,
    pub replacement: Option<ModuleRef>,
}

impl DependencyInfo {
    /// A plain requirement on `name` at `version`.
    pub fn required(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            replacement: None,
        }
    }

    /// A module replaced by `replacement`.
    pub fn replaced(
        name: impl Into<String>,
        version: Option<String>,
        replacement: ModuleRef,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            replacement: Some(replacement),
        }
    }

    /// An entry that carries nothing but the module name.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            replacement: None,
        }
    }

    pub fn is_replaced(&self) -> bool {
        self.replacement.is_some()
    }

    pub fn version_str(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }

    pub fn replacement_name(&self) -> &str {
        self.replacement.as_ref().map_or("", |r| r.path.as_str())
    }

    pub fn replacement_version(&self) -> &str {
        self.replacement
            .as_ref()
            .and_then(|r| r.version.as_deref())
            .unwrap_or("")
    }
}

impl fmt::Display for DependencyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = ModuleRef {
            path: self.name.clone(),
            version: self.version.clone(),
        };
        match &self.replacement {
            Some(replacement) => write!(f, "{} => {}", module, replacement),
            None => write!(f, "{}", module),
        }
    }
}

/// Flat wire shape of [`DependencyInfo`] used in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DependencyRecord {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default)]
    replacement: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    replacement_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    replacement_version: Option<String>,
}

impl From<DependencyInfo> for DependencyRecord {
    fn from(info: DependencyInfo) -> Self {
        let (replacement_name, replacement_version) = match info.replacement {
            Some(r) => (Some(r.path), r.version),
            None => (None, None),
        };
        Self {
            name: info.name,
            version: info.version,
            replacement: replacement_name.is_some(),
            replacement_name,
            replacement_version,
        }
    }
}

impl From<DependencyRecord> for DependencyInfo {
    fn from(record: DependencyRecord) -> Self {
        // Replacement fields only count when the flag is set
        let replacement = match (record.replacement, record.replacement_name) {
            (true, Some(path)) => Some(ModuleRef {
                path,
                version: record.replacement_version,
            }),
            _ => None,
        };
        Self {
            name: record.name,
            version: record.version,
            replacement,
        }
    }
}

/// A parsed descriptor file.
///
/// `None` for a section means the descriptor has no such section at all;
/// parsers and the merger never produce `Some` of an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    pub tool_version: Option<String>,
    pub requirements: Option<BTreeMap<String, Requirement>>,
    pub replacements: Option<BTreeMap<String, ReplaceDirective>>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = Some(version.into());
        self
    }

    /// Add or overwrite a requirement, keyed by its module path.
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements
            .get_or_insert_with(BTreeMap::new)
            .insert(requirement.path.clone(), requirement);
        self
    }

    /// Add or overwrite a replacement, keyed by its left-hand module path.
    pub fn with_replacement(mut self, directive: ReplaceDirective) -> Self {
        self.replacements
            .get_or_insert_with(BTreeMap::new)
            .insert(directive.old.path.clone(), directive);
        self
    }

    pub fn requirement(&self, path: &str) -> Option<&Requirement> {
        self.requirements.as_ref().and_then(|m| m.get(path))
    }

    pub fn replacement(&self, path: &str) -> Option<&ReplaceDirective> {
        self.replacements.as_ref().and_then(|m| m.get(path))
    }

    /// Requirement on `path` that is not also replaced.
    pub fn plain_requirement(&self, path: &str) -> Option<&Requirement> {
        if self.replacement(path).is_some() {
            return None;
        }
        self.requirement(path)
    }

    /// Whether `path` appears in either section.
    pub fn declares(&self, path: &str) -> bool {
        self.requirement(path).is_some() || self.replacement(path).is_some()
    }

    pub fn requirement_entries(&self) -> impl Iterator<Item = &Requirement> {
        self.requirements.iter().flat_map(|m| m.values())
    }

    pub fn replacement_entries(&self) -> impl Iterator<Item = &ReplaceDirective> {
        self.replacements.iter().flat_map(|m| m.values())
    }

    /// Resolve a single module, replacement first.
    pub fn resolve_one(&self, path: &str) -> Option<DependencyInfo> {
        if let Some(directive) = self.replacement(path) {
            let version = directive
                .old
                .version
                .clone()
                .or_else(|| self.requirement(path).map(|r| r.version.clone()));
            return Some(DependencyInfo::replaced(
                path,
                version,
                directive.new.clone(),
            ));
        }
        self.requirement(path)
            .map(|r| DependencyInfo::required(&r.path, &r.version))
    }

    /// One [`DependencyInfo`] per declared module, replacements taking
    /// precedence over requirements.
    pub fn resolve(&self) -> BTreeMap<String, DependencyInfo> {
        let mut resolved = BTreeMap::new();
        for directive in self.replacement_entries() {
            if let Some(info) = self.resolve_one(&directive.old.path) {
                resolved.insert(directive.old.path.clone(), info);
            }
        }
        for requirement in self.requirement_entries() {
            if !resolved.contains_key(&requirement.path) {
                resolved.insert(
                    requirement.path.clone(),
                    DependencyInfo::required(&requirement.path, &requirement.version),
                );
            }
        }
        resolved
    }

    /// Collapse empty sections to `None`.
    pub fn normalized(mut self) -> Self {
        if self.requirements.as_ref().is_some_and(|m| m.is_empty()) {
            self.requirements = None;
        }
        if self.replacements.as_ref().is_some_and(|m| m.is_empty()) {
            self.replacements = None;
        }
        self
    }
}
