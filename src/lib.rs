//! # Feeder Publish Library
//!
//! This library converts a batch of OpenDSS feeder model directories into
//! one JSON file per feeder under a version-named output directory, and
//! reports the outcome of the run to a CI orchestrator through an
//! append-only key/value file. It backs the `feeder-publish` command-line
//! tool.
//!
//! ## Quick Example
//!
//! ```no_run
//! use feeder_publish::config::RunConfig;
//! use feeder_publish::model::DssReader;
//! use feeder_publish::phases::orchestrator;
//! use feeder_publish::version::ModelVersion;
//!
//! let config = RunConfig::new(
//!     "opendss",
//!     "/data/models",
//!     "/tmp/github_output",
//!     ModelVersion::new("1.2.3").unwrap(),
//! );
//!
//! // Writes /data/models/1_2_3/<feeder>.json and appends either
//! // `branch=auto/1.2.3_<uuid>` or an `errormessage<<EOF` block.
//! let outcome = orchestrator::run_and_report(&config, &DssReader::new()).unwrap();
//! println!("success: {}", outcome.is_success());
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: Where models are read from, where
//!   artifacts and the report go, and which model version is published.
//! - **Versions (`version`)**: The injected version identifier, its
//!   directory-safe form and the branch names derived from it.
//! - **Models (`model`)**: The `ModelReader` seam and the built-in OpenDSS
//!   reader producing serializable `SystemModel`s.
//! - **Phases (`phases`)**: The pipeline itself.
//! - **Reporting (`report`)**: The success/failure records read by CI.
//!
//! ## Execution Flow
//!
//! The main entry point is `phases::orchestrator`, which executes:
//!
//! 1.  **Discovery**: List the feeder directories under the models root.
//! 2.  **Publish**: Delete and recreate `<output root>/<version with _>`.
//! 3.  **Conversion**: Read every model and write `<feeder>.json`.
//! 4.  **Permissions**: Open up permissions on the whole output root.
//!
//! Any error in these steps becomes a failure record carrying the error and
//! its causes; otherwise a fresh branch name is reported.

pub mod config;
pub mod error;
pub mod model;
pub mod phases;
pub mod report;
pub mod version;

#[cfg(test)]
mod report_proptest;
