//! # Model Version Identifiers
//!
//! The model version names two things: the versioned output directory a run
//! publishes into, and the branch name reported back to CI. It is always
//! supplied by the caller (configuration, CLI flag or environment) rather
//! than looked up from installed package metadata, so a run is fully
//! determined by its inputs.
//!
//! - [`ModelVersion::sanitized`] turns `1.2.3` into `1_2_3` for directory
//!   names, so the version cannot be mistaken for a file extension.
//! - [`ModelVersion::branch_name`] composes `auto/<version>_<uuid>` using the
//!   version as given.

use std::fmt;

use uuid::Uuid;

use crate::error::{Error, Result};

/// Prefix of every branch name reported on success.
pub const BRANCH_PREFIX: &str = "auto/";

/// Version identifier of the model library a batch is published for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelVersion(String);

impl ModelVersion {
    /// Validate and wrap a version string.
    ///
    /// The version ends up in a directory name and in a single-line report
    /// record, so it must be non-empty and free of path separators and line
    /// breaks.
    pub fn new(version: impl Into<String>) -> Result<Self> {
        let version = version.into();
        let trimmed = version.trim();

        if trimmed.is_empty() {
            return Err(Error::Config {
                message: "model version must not be empty".to_string(),
                hint: Some("pass --model-version or set FEEDER_MODEL_VERSION".to_string()),
            });
        }
        if trimmed.contains(['/', '\\']) {
            return Err(Error::Config {
                message: format!("model version '{}' contains a path separator", trimmed),
                hint: None,
            });
        }
        if trimmed.contains(['\n', '\r']) {
            return Err(Error::Config {
                message: "model version contains a line break".to_string(),
                hint: None,
            });
        }
        if trimmed.chars().all(|c| c == '.') {
            return Err(Error::Config {
                message: format!("model version '{}' is not a usable directory name", trimmed),
                hint: None,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The version exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory-safe form of the version: every `.` becomes `_`.
    pub fn sanitized(&self) -> String {
        sanitize(&self.0)
    }

    /// A fresh branch name `auto/<version>_<uuid-v4>`.
    pub fn branch_name(&self) -> String {
        self.branch_name_with_suffix(&Uuid::new_v4().to_string())
    }

    /// Branch name with a caller-chosen suffix instead of a random one.
    pub fn branch_name_with_suffix(&self, suffix: &str) -> String {
        format!("{}{}_{}", BRANCH_PREFIX, self.0, suffix)
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace every period in `version` with an underscore.
pub fn sanitize(version: &str) -> String {
    version.replace('.', "_")
}
