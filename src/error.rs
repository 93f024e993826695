//! # Error Handling
//!
//! This module defines the centralized error type for `feeder-publish`. It
//! uses `thiserror` to build a single `Error` enum covering every failure a
//! publish run can hit, each variant carrying enough context (paths, line
//! numbers, keys) to make the rendered message useful on its own.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure family of the pipeline:
//!   - Configuration problems detected before any filesystem mutation.
//!   - Discovery of model directories.
//!   - Model reading (OpenDSS parse failures, missing entry points).
//!   - Filesystem operations of the publisher and permission normalizer.
//!   - Report file writes.
//!   - Wrapped I/O errors.
//!
//! - **`Result<T>`**: alias for `std::result::Result<T, Error>`.
//!
//! Below the orchestrator nothing is caught or classified: functions return
//! `Result<T>` and propagate with `?`. The orchestrator is the only place an
//! `Error` is turned into a failure record, and it renders every variant the
//! same way (message plus cause chain).

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for feeder-publish operations
#[derive(Error, Debug)]
pub enum Error {
    /// The run configuration is incomplete or invalid.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration
        hint: Option<String>,
    },

    /// The models root could not be listed.
    #[error("Model discovery error in {}: {message}", root.display())]
    Discovery { root: PathBuf, message: String },

    /// A model directory does not contain the expected entry-point file.
    #[error("Entry point not found: {}", path.display())]
    MissingEntryPoint { path: PathBuf },

    /// An entry-point path has no parent directory to name the artifact after.
    #[error("Cannot derive feeder name from entry point {}", path.display())]
    FeederName { path: PathBuf },

    /// The model reader rejected a script.
    ///
    /// `line` is 1-based and refers to `path`, which may be a redirected
    /// file rather than the entry point.
    #[error("Model parse error at {}:{line}: {message}", path.display())]
    ModelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A model script ran to completion without defining a circuit.
    #[error("No circuit defined in {}", path.display())]
    EmptyModel { path: PathBuf },

    /// A model script failed to load for a reason other than its content.
    #[error("Failed to read model {}", path.display())]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A filesystem operation on the output tree failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Writing to the report file failed or was refused.
    #[error("Report error for key '{key}': {message}")]
    Report { key: String, message: String },

    /// Serializing a system model failed.
    #[error("Failed to serialize model to {}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::Filesystem`] from an I/O failure on `path`.
    pub(crate) fn filesystem(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        Error::Filesystem {
            message: format!("Failed to {} '{}'", action, path.display()),
            source: Some(err),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
