//! Phase 3: Batch Conversion
//!
//! For each entry point, in order:
//!
//! 1.  **Name**: The artifact is named after the entry point's *parent*
//!     directory (the feeder directory), plus the configured extension.
//!
//! 2.  **Read**: The model reader parses the entry point. A reader error is
//!     returned immediately; later entry points are not processed.
//!
//! 3.  **Write**: The model is serialized into the destination directory,
//!     replacing any file of the same name.
//!
//! Artifacts written before a failure stay on disk.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};
use crate::model::ModelReader;

/// Executes Phase 3 of the pipeline.
///
/// Returns the artifact paths in the order they were written.
pub fn execute<R, I, P>(
    reader: &R,
    entry_points: I,
    destination: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>>
where
    R: ModelReader + ?Sized,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut written = Vec::new();

    for entry_point in entry_points {
        let entry_point = entry_point.as_ref();
        let artifact = destination.join(artifact_name(entry_point, extension)?);

        debug!("Reading {}", entry_point.display());
        let model = reader.read(entry_point)?;

        model.to_json_file(&artifact)?;
        debug!(
            "Wrote {} ({} components)",
            artifact.display(),
            model.components.len()
        );
        written.push(artifact);
    }

    info!(
        "Converted {} models into {}",
        written.len(),
        destination.display()
    );
    Ok(written)
}

/// `<feeder directory name>.<extension>` for an entry point.
pub fn artifact_name(entry_point: &Path, extension: &str) -> Result<String> {
    let feeder = entry_point
        .parent()
        .and_then(Path::file_name)
        .ok_or_else(|| Error::FeederName {
            path: entry_point.to_path_buf(),
        })?;
    Ok(format!("{}.{}", feeder.to_string_lossy(), extension))
}
