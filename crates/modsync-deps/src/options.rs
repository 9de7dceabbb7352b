//! Policy knobs threaded into comparison and merging.

use serde::{Deserialize, Serialize};

/// Reconciliation policy.
///
/// # Example
///
/// ```
/// use modsync_deps::ReconcileOptions;
///
/// let options: ReconcileOptions = serde_json::from_str("{}").unwrap();
/// assert!(!options.allow_host_only_replacements);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Tolerate a host replacement the plugin does not mirror.
    ///
    /// Used when the plugin builds against a fork of a module the host
    /// replaces: the host directive is then neither reported nor merged in.
    pub allow_host_only_replacements: bool,
}

impl ReconcileOptions {
    pub fn allowing_host_only_replacements(mut self, allow: bool) -> Self {
        self.allow_host_only_replacements = allow;
        self
    }
}
