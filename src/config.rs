//! # Run Configuration
//!
//! A publish run needs four locations and a version:
//!
//! - `models_root`: directory whose immediate subdirectories are feeder models
//!   (default `opendss`)
//! - `output_root`: destination root; the versioned directory is created here
//! - `report_path`: append-only key/value file read by the CI orchestrator
//! - `version`: model version used for the output directory and branch name
//!
//! Values can come from a YAML file and are then overridden field by field by
//! the CLI (which itself falls back to environment variables). Partial
//! settings are collected in [`ConfigFile`] and resolved into a validated
//! [`RunConfig`] before anything touches the filesystem.
//!
//! ## File Format
//!
//! ```yaml
//! models_root: opendss
//! output_root: /data/models
//! report_path: /tmp/github_output
//! version: "1.2.3"
//! entry_point: Master.dss
//! extension: json
//! ```
//!
//! Quote the version: YAML reads `1.2` as a number.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::version::ModelVersion;

/// Models root used when none is configured, relative to the working
/// directory.
pub const DEFAULT_MODELS_ROOT: &str = "opendss";

/// File name the reader opens inside every model directory.
pub const DEFAULT_ENTRY_POINT: &str = "Master.dss";

/// Extension of the JSON artifact written per model directory.
pub const DEFAULT_EXTENSION: &str = "json";

/// Partial configuration as read from a YAML file or assembled from flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub models_root: Option<PathBuf>,
    #[serde(default)]
    pub output_root: Option<PathBuf>,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub entry_point: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

impl ConfigFile {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: ConfigFile) -> ConfigFile {
        ConfigFile {
            models_root: other.models_root.or(self.models_root),
            output_root: other.output_root.or(self.output_root),
            report_path: other.report_path.or(self.report_path),
            version: other.version.or(self.version),
            entry_point: other.entry_point.or(self.entry_point),
            extension: other.extension.or(self.extension),
        }
    }

    /// Resolve into a complete [`RunConfig`], failing on missing or invalid
    /// values.
    pub fn resolve(self) -> Result<RunConfig> {
        let models_root = self
            .models_root
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_ROOT));
        let output_root = require(self.output_root, "output_root", "--output or INPUT_DATAPATH")?;
        let report_path = require(self.report_path, "report_path", "--report or GITHUB_OUTPUT")?;
        let version = require(self.version, "version", "--model-version or FEEDER_MODEL_VERSION")?;

        let config = RunConfig {
            models_root,
            output_root,
            report_path,
            version: ModelVersion::new(version)?,
            entry_point: self
                .entry_point
                .unwrap_or_else(|| DEFAULT_ENTRY_POINT.to_string()),
            extension: self
                .extension
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        };
        config.validate()?;
        Ok(config)
    }
}

fn require<T>(value: Option<T>, field: &str, source: &str) -> Result<T> {
    value.ok_or_else(|| Error::Config {
        message: format!("missing required setting '{}'", field),
        hint: Some(format!("set it in the config file or via {}", source)),
    })
}

/// Fully resolved settings for one publish run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub models_root: PathBuf,
    pub output_root: PathBuf,
    pub report_path: PathBuf,
    pub version: ModelVersion,
    /// File name opened inside each model directory.
    pub entry_point: String,
    /// Artifact extension, without the leading dot.
    pub extension: String,
}

impl RunConfig {
    /// Configuration with default entry point and extension.
    pub fn new(
        models_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        report_path: impl Into<PathBuf>,
        version: ModelVersion,
    ) -> Self {
        Self {
            models_root: models_root.into(),
            output_root: output_root.into(),
            report_path: report_path.into(),
            version,
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.extension.is_empty() || self.extension.starts_with('.') {
            return Err(Error::Config {
                message: format!("invalid artifact extension '{}'", self.extension),
                hint: Some("use a bare extension such as 'json'".to_string()),
            });
        }
        if self.entry_point.is_empty() || self.entry_point.contains(['/', '\\']) {
            return Err(Error::Config {
                message: format!("invalid entry point '{}'", self.entry_point),
                hint: Some("use a file name such as 'Master.dss'".to_string()),
            });
        }
        Ok(())
    }
}

/// Parse a YAML configuration string.
pub fn parse(yaml_content: &str) -> Result<ConfigFile> {
    if yaml_content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(yaml_content).map_err(|e| Error::Config {
        message: e.to_string(),
        hint: None,
    })
}

/// Read and parse a YAML configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
