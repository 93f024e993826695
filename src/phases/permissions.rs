//! Phase 4: Permission Normalization
//!
//! Downstream CI stages may run as another user, so every published path is
//! made readable and writable by everyone: directories get `0o777`, files
//! get `0o666`, and the root itself gets `0o777` last.
//!
//! The walk is top-down and each path is set independently, so sibling order
//! does not matter and running it twice changes nothing. Symbolic links are
//! neither followed nor changed; only paths inside the tree are touched.

use std::fs;
use std::path::Path;

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Mode applied to directories, including the root.
pub const DIR_MODE: u32 = 0o777;

/// Mode applied to regular files.
pub const FILE_MODE: u32 = 0o666;

/// Counts of paths whose permissions were set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionStats {
    /// Directories, including the root.
    pub directories: usize,
    pub files: usize,
}

/// Executes Phase 4 of the pipeline.
pub fn execute(root: &Path) -> Result<PermissionStats> {
    let stats = normalize(root)?;
    info!(
        "Opened permissions on {} directories and {} files under {}",
        stats.directories,
        stats.files,
        root.display()
    );
    Ok(stats)
}

/// Recursively open permissions under `root`, then on `root` itself.
pub fn normalize(root: &Path) -> Result<PermissionStats> {
    let mut stats = PermissionStats::default();

    open_children(root, &mut stats)?;

    set_mode(root, DIR_MODE)?;
    stats.directories += 1;

    Ok(stats)
}

/// Open every entry directly inside `dir`, descending into subdirectories.
/// A subdirectory's mode is set before it is listed, so directories that
/// start out unreadable are still walked.
fn open_children(dir: &Path, stats: &mut PermissionStats) -> Result<()> {
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Filesystem {
            message: format!("Failed to walk '{}': {}", dir.display(), e),
            source: e.into_io_error(),
        })?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            set_mode(entry.path(), DIR_MODE)?;
            stats.directories += 1;
            open_children(entry.path(), stats)?;
        } else if file_type.is_file() {
            set_mode(entry.path(), FILE_MODE)?;
            stats.files += 1;
        } else {
            debug!("Leaving {} unchanged", entry.path().display());
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(|e| Error::filesystem("set permissions on", path, e))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, _mode: u32) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| Error::filesystem("inspect", path, e))?;
    let mut permissions = metadata.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
        .map_err(|e| Error::filesystem("set permissions on", path, e))
}
