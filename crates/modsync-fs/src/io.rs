//! Checked reads, atomic writes and backups

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Verify that `path` names an existing regular file.
///
/// Called before any read so that callers get [`Error::NotFound`] or
/// [`Error::IsDirectory`] instead of a generic I/O failure.
pub fn check_file(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    if metadata.is_dir() {
        return Err(Error::IsDirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Read text content from a file after [`check_file`] has accepted it.
pub fn read_text(path: &Path) -> Result<String> {
    check_file(path)?;
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a reader never sees a partial file.
/// The temp file is removed again if any step fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let written = write_locked(&temp_path, path, content)
        .and_then(|()| fs::rename(&temp_path, path).map_err(|e| Error::io(path, e)));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

fn write_locked(temp_path: &Path, path: &Path, content: &[u8]) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })
}

/// Write text content to a file atomically.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Path of the `attempt`-th numbered copy of `path` inside `dir`.
///
/// `numbered_path("tmp", "plugin/go.mod", 2)` is `tmp/go.mod-2`.
pub fn numbered_path(dir: &Path, path: &Path, attempt: usize) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    dir.join(format!("{}-{}", file_name, attempt))
}

/// Move `path` into `backup_dir` under the first free numbered name.
///
/// Returns the path of the backup.
pub fn backup_file(path: &Path, backup_dir: &Path) -> Result<PathBuf> {
    check_file(path)?;
    fs::create_dir_all(backup_dir).map_err(|e| Error::io(backup_dir, e))?;

    let mut attempt = 1;
    let target = loop {
        let candidate = numbered_path(backup_dir, path, attempt);
        if !candidate.exists() {
            break candidate;
        }
        attempt += 1;
    };

    fs::rename(path, &target).map_err(|e| Error::io(path, e))?;
    tracing::info!(from = %path.display(), to = %target.display(), "backed up file");
    Ok(target)
}
