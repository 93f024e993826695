//! Orchestrator for a complete publish run
//!
//! Runs the phases in order and is the single error boundary of a run:
//! nothing below it catches or classifies errors, and whatever comes out of
//! the phases is turned into exactly one [`RunOutcome`].

use super::{entry_points, phase1, phase2, phase3, phase4};
use crate::config::RunConfig;
use crate::error::Result;
use crate::model::ModelReader;
use crate::report::Reporter;
use log::{error, info};
use std::path::PathBuf;

pub use crate::report::RunOutcome;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSummary {
    /// The recreated versioned output directory.
    pub output_dir: PathBuf,
    /// Artifacts in conversion order.
    pub artifacts: Vec<PathBuf>,
    /// Branch name to report.
    pub branch: String,
}

/// Execute the publish pipeline (Phases 1-4) and name the branch.
///
/// 1. Discover model directories
/// 2. Recreate the versioned output directory
/// 3. Convert every model into it
/// 4. Open permissions on the whole output root
///
/// Stops at the first error; artifacts already written are left in place.
pub fn execute_publish<R>(config: &RunConfig, reader: &R) -> Result<PublishSummary>
where
    R: ModelReader + ?Sized,
{
    // Phase 1: Discovery
    let models = phase1::execute(&config.models_root, &config.entry_point)?;

    // Phase 2: Versioned publish
    let output_dir = phase2::execute(&config.output_root, &config.version)?;

    // Phase 3: Conversion
    let artifacts = phase3::execute(reader, entry_points(&models), &output_dir, &config.extension)?;

    // Phase 4: Permissions, over the whole output root
    phase4::execute(&config.output_root)?;

    Ok(PublishSummary {
        output_dir,
        artifacts,
        branch: config.version.branch_name(),
    })
}

/// Run the pipeline and fold its result into a [`RunOutcome`].
pub fn run<R>(config: &RunConfig, reader: &R) -> RunOutcome
where
    R: ModelReader + ?Sized,
{
    match execute_publish(config, reader) {
        Ok(summary) => {
            info!(
                "Published {} artifacts to {}",
                summary.artifacts.len(),
                summary.output_dir.display()
            );
            RunOutcome::Success {
                branch: summary.branch,
            }
        }
        Err(e) => {
            error!("Publish failed: {}", e);
            RunOutcome::failure(e)
        }
    }
}

/// Run the pipeline and append its outcome to the configured report file.
///
/// The returned outcome has already been reported. An error here means the
/// report itself could not be written.
pub fn run_and_report<R>(config: &RunConfig, reader: &R) -> Result<RunOutcome>
where
    R: ModelReader + ?Sized,
{
    let outcome = run(config, reader);
    Reporter::new(&config.report_path).report_outcome(&outcome)?;
    Ok(outcome)
}
