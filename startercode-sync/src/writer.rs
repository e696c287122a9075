//! Output writer.
//!
//! ## `write_file` protocol
//!
//! 1. Normalise line endings to LF.
//! 2. Create parent directories.
//! 3. Write to `<path>.startercode.tmp`.
//! 4. Rename to the final path (atomic on POSIX), replacing any existing file.
//!
//! Existing files are always overwritten; identical metadata yields
//! identical bytes, so repeated runs are idempotent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Outcome of an individual file operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written.
    Written { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
    /// A stale output file was deleted (`--prune`).
    Removed { path: PathBuf },
    /// `--dry-run --prune`: the stale file *would* have been deleted.
    WouldRemove { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::WouldWrite { path }
            | WriteResult::Removed { path }
            | WriteResult::WouldRemove { path } => path,
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.startercode.tmp", path.display()))
}

/// Atomically write `content` to `path`.
pub fn write_file(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, SyncError> {
    write_file_with_tmp(path, content, dry_run, &tmp_path(path))
}

fn write_file_with_tmp(
    path: &Path,
    content: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, SyncError> {
    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let content = content.replace("\r\n", "\n");

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, &content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::debug!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

/// Delete files in `dir` with extension `ext` that are not in `keep`.
///
/// A missing `dir` is not an error. Sub-directories are left alone.
pub fn prune_dir(
    dir: &Path,
    ext: &str,
    keep: &HashSet<PathBuf>,
    dry_run: bool,
) -> Result<Vec<WriteResult>, SyncError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut stale: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(ext))
        .filter(|p| !keep.contains(p))
        .collect();
    stale.sort();

    let mut results = Vec::with_capacity(stale.len());
    for path in stale {
        if dry_run {
            tracing::info!("[dry-run] would remove: {}", path.display());
            results.push(WriteResult::WouldRemove { path });
        } else {
            std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
            tracing::info!("removed stale output: {}", path.display());
            results.push(WriteResult::Removed { path });
        }
    }
    Ok(results)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
