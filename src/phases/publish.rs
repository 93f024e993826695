//! Phase 2: Versioned Publish
//!
//! Computes `output_root/<sanitized version>` and makes it an empty
//! directory. Whatever was there from an earlier run is deleted first, so the
//! directory only ever holds the artifacts of the current run. Filesystem
//! errors are returned as-is; nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::version::ModelVersion;

/// Executes Phase 2 of the pipeline.
pub fn execute(output_root: &Path, version: &ModelVersion) -> Result<PathBuf> {
    let target = versioned_dir(output_root, version);
    recreate_dir(&target)?;
    info!("Publishing into {}", target.display());
    Ok(target)
}

/// The versioned output directory for `version` under `output_root`.
pub fn versioned_dir(output_root: &Path, version: &ModelVersion) -> PathBuf {
    output_root.join(version.sanitized())
}

/// Delete `dir` if present (recursively, or as a file) and create it empty,
/// including missing parents.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(dir).map_err(|e| Error::filesystem("remove directory", dir, e))?;
        }
        Ok(_) => {
            fs::remove_file(dir).map_err(|e| Error::filesystem("remove file", dir, e))?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::filesystem("inspect", dir, e)),
    }

    fs::create_dir_all(dir).map_err(|e| Error::filesystem("create directory", dir, e))
}
