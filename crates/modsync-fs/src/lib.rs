//! File boundary for modsync
//!
//! Every read of a descriptor goes through [`io::check_file`] first so that a
//! missing path or a directory is reported before any content is touched.
//! Writes are atomic and backups are plain renames.

pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
