//! Command implementations for modsync-cli

pub mod compare;
pub mod merge;
pub mod output;
pub mod resolve;

pub use compare::run_compare;
pub use merge::run_merge;
pub use resolve::run_resolve;

use std::path::Path;

use modsync_deps::ModuleDescriptor;

use crate::error::{CliError, Result};

/// Whether a command left the plugin reconciled with its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reconciled,
    Mismatched,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Reconciled => 0,
            Outcome::Mismatched => 1,
        }
    }
}

/// Load the plugin and host descriptors, each in its detected grammar.
pub fn load_pair(plugin: &Path, host: &Path) -> Result<(ModuleDescriptor, ModuleDescriptor)> {
    if plugin == host {
        return Err(CliError::user(format!(
            "plugin and host must be different files (got {} twice)",
            plugin.display()
        )));
    }

    let plugin_descriptor = modsync_deps::load(plugin, None)?;
    let host_descriptor = modsync_deps::load(host, None)?;
    tracing::debug!(
        plugin = %plugin_descriptor.name,
        host = %host_descriptor.name,
        "loaded descriptors"
    );
    Ok((plugin_descriptor, host_descriptor))
}
