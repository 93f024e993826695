//! Publish command implementation
//!
//! The publish command is what CI runs. It executes the full pipeline:
//! 1. Discovery of the model directories
//! 2. Recreating the versioned output directory
//! 3. Converting every model to JSON
//! 4. Opening permissions on the output root
//!
//! and appends exactly one record to the report file: `branch=...` on
//! success, an `errormessage<<EOF` block on failure. The report file is the
//! authoritative result, so a failed run still exits 0 unless
//! `--fail-on-error` is given.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use feeder_publish::config::{self, ConfigFile, RunConfig};
use feeder_publish::model::DssReader;
use feeder_publish::phases::orchestrator::{self, RunOutcome};
use feeder_publish::report::Reporter;

/// Arguments for the publish command
#[derive(Args, Debug)]
pub struct PublishArgs {
    /// YAML config file; flags override its values
    #[arg(short, long, value_name = "PATH", env = "FEEDER_PUBLISH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory whose subdirectories are feeder models [default: opendss]
    #[arg(short, long, value_name = "PATH", env = "FEEDER_MODELS")]
    pub models: Option<PathBuf>,

    /// Output root; the versioned directory is created inside it
    #[arg(short, long, value_name = "PATH", env = "INPUT_DATAPATH")]
    pub output: Option<PathBuf>,

    /// Report file that receives the outcome record
    #[arg(short, long, value_name = "PATH", env = "GITHUB_OUTPUT")]
    pub report: Option<PathBuf>,

    /// Model version to publish, e.g. 1.2.3
    #[arg(long, value_name = "VERSION", env = "FEEDER_MODEL_VERSION")]
    pub model_version: Option<String>,

    /// Entry-point file inside each model directory [default: Master.dss]
    #[arg(long, value_name = "FILE")]
    pub entry_point: Option<String>,

    /// Artifact extension [default: json]
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Exit with a non-zero status when the run fails
    #[arg(long)]
    pub fail_on_error: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl PublishArgs {
    fn overrides(&self) -> ConfigFile {
        ConfigFile {
            models_root: self.models.clone(),
            output_root: self.output.clone(),
            report_path: self.report.clone(),
            version: self.model_version.clone(),
            entry_point: self.entry_point.clone(),
            extension: self.extension.clone(),
        }
    }

    /// Config file values overlaid with flags.
    fn settings(&self) -> Result<ConfigFile> {
        let base = match &self.config {
            Some(path) => config::from_file(path)?,
            None => ConfigFile::default(),
        };
        Ok(base.merge(self.overrides()))
    }
}

/// Execute the publish command
pub fn execute(args: PublishArgs) -> Result<()> {
    use std::time::Instant;

    let start_time = Instant::now();

    let outcome = match resolve(&args) {
        Ok(run_config) => {
            if !args.quiet {
                println!("📦 Feeder Publish {}", run_config.version);
                println!();
            }
            orchestrator::run_and_report(&run_config, &DssReader::new())?
        }
        Err((report_path, err)) => {
            // Without a report file there is nobody to tell but the caller.
            let Some(report_path) = report_path else {
                return Err(err);
            };
            let outcome = RunOutcome::failure(err);
            Reporter::new(report_path).report_outcome(&outcome)?;
            outcome
        }
    };

    match outcome {
        RunOutcome::Success { branch } => {
            if !args.quiet {
                let duration = start_time.elapsed();
                println!("✅ Published in {:.2}s", duration.as_secs_f64());
                println!("   branch: {}", branch);
            }
            Ok(())
        }
        RunOutcome::Failure { trace } => {
            if !args.quiet {
                println!("❌ Publish failed; details written to the report file");
            }
            if args.fail_on_error {
                anyhow::bail!("Publish failed:\n{}", trace);
            }
            Ok(())
        }
    }
}

/// Resolve the run configuration. On failure, also return the report path if
/// one was configured so the failure can still be recorded.
fn resolve(args: &PublishArgs) -> std::result::Result<RunConfig, (Option<PathBuf>, anyhow::Error)> {
    let settings = args.settings().map_err(|e| (args.report.clone(), e))?;
    let report_path = settings.report_path.clone();
    settings.resolve().map_err(|e| (report_path, e.into()))
}
