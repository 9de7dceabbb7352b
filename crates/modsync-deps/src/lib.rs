//! Dependency reconciliation for modsync
//!
//! Parses plugin and host module descriptors, reports where the plugin
//! disagrees with its host and merges the plugin toward the host's choices.
//!
//! ```
//! use modsync_deps::{compare, merge, parse, ReconcileOptions};
//!
//! let plugin = parse("module plugin\n\nrequire (\n\tgithub.com/a/b v1.0.0\n)\n").unwrap();
//! let host = parse("host\ngithub.com/a/b v1.1.0\n").unwrap();
//!
//! let report = compare(&plugin, &host, &ReconcileOptions::default());
//! assert_eq!(report.len(), 1);
//!
//! let merged = merge(&plugin, &host);
//! assert!(compare(&merged, &host, &ReconcileOptions::default()).is_empty());
//! ```

pub mod compare;
pub mod descriptor;
pub mod error;
pub mod merge;
pub mod options;
pub mod parser;
pub mod render;
pub mod report;

pub use compare::{classify, compare, compare_resolved};
pub use descriptor::{DependencyInfo, ModuleDescriptor, ModuleRef, ReplaceDirective, Requirement};
pub use error::{Error, Result};
pub use merge::{Resolution, merge, merge_with_options, resolve};
pub use options::ReconcileOptions;
pub use parser::{Grammar, load, parse, parse_with};
pub use render::{render_descriptor, render_suggestions};
pub use report::{MismatchEntry, MismatchKind, Report};
