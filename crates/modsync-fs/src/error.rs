//! Error types for modsync-fs

use std::path::PathBuf;

/// Result type for modsync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the file boundary
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{} file not found", path.display())]
    NotFound { path: PathBuf },

    #[error("{} is a directory", path.display())]
    IsDirectory { path: PathBuf },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {}: {message}", path.display())]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {}: {message}", path.display())]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {}", path.display())]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
