//! Implementation of the phases of a feeder publish run.
//!
//! ## Overview
//!
//! A run follows 4 phases:
//! 1. Discovery - List the model directories under the models root
//! 2. Publish - Recreate the versioned output directory empty
//! 3. Conversion - Read each model and write its JSON artifact
//! 4. Permissions - Open up permissions on the whole output root
//!
//! The orchestrator runs them in order and turns the result into a
//! [`orchestrator::RunOutcome`]. Each phase depends only on the previous
//! phases and the foundation modules (`error`, `config`, `model`).

use std::path::{Path, PathBuf};

// Phase modules
pub mod convert;
pub mod discovery;
pub mod orchestrator;
pub mod permissions;
pub mod publish;

// Re-export phase modules in pipeline order
pub use convert as phase3;
pub use discovery as phase1;
pub use permissions as phase4;
pub use publish as phase2;

/// One feeder model found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDirectory {
    /// Directory name; also the artifact's base name.
    pub name: String,
    /// The directory itself.
    pub path: PathBuf,
    /// File the reader opens inside `path`.
    pub entry_point: PathBuf,
}

impl ModelDirectory {
    pub fn new(path: impl Into<PathBuf>, entry_point_name: &str) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let entry_point = path.join(entry_point_name);
        Self {
            name,
            path,
            entry_point,
        }
    }

    /// Whether the entry-point file is present.
    pub fn has_entry_point(&self) -> bool {
        self.entry_point.is_file()
    }
}

/// Entry-point paths of `dirs`, in order.
pub fn entry_points(dirs: &[ModelDirectory]) -> Vec<&Path> {
    dirs.iter().map(|d| d.entry_point.as_path()).collect()
}
