//! Phase 1: Discovery
//!
//! Lists the feeder model directories under the models root. Every immediate
//! subdirectory is a model; its entry point is assumed to exist and is only
//! checked when the model is read, so a directory without one fails the run
//! at conversion time rather than being silently dropped.
//!
//! Hidden directories (names starting with `.`) and plain files are skipped.
//! Results are sorted by name so a run converts models in a stable order.

use std::path::Path;

use log::{debug, info};

use super::ModelDirectory;
use crate::error::{Error, Result};

/// Executes Phase 1 of the pipeline.
pub fn execute(models_root: &Path, entry_point_name: &str) -> Result<Vec<ModelDirectory>> {
    let dirs = discover_models(models_root, entry_point_name)?;
    info!(
        "Discovered {} model directories in {}",
        dirs.len(),
        models_root.display()
    );
    Ok(dirs)
}

/// List the immediate subdirectories of `models_root` as model directories.
pub fn discover_models(models_root: &Path, entry_point_name: &str) -> Result<Vec<ModelDirectory>> {
    let discovery_error = |message: String| Error::Discovery {
        root: models_root.to_path_buf(),
        message,
    };

    if !models_root.is_dir() {
        return Err(discovery_error("not a directory".to_string()));
    }

    let mut dirs = Vec::new();
    for entry in walkdir::WalkDir::new(models_root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| discovery_error(e.to_string()))?;
        let name = entry.file_name().to_string_lossy();

        if name.starts_with('.') {
            debug!("Skipping hidden entry {}", entry.path().display());
            continue;
        }
        if !entry.path().is_dir() {
            debug!("Skipping non-directory {}", entry.path().display());
            continue;
        }

        dirs.push(ModelDirectory::new(entry.path(), entry_point_name));
    }

    Ok(dirs)
}
