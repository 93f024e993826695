//! Convert command implementation
//!
//! Reads a single model directory and prints its JSON, or writes it to a
//! file. Useful for checking one feeder locally before a publish run;
//! unlike `publish`, errors go straight to the exit status.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

use feeder_publish::config::DEFAULT_ENTRY_POINT;
use feeder_publish::model::{DssReader, ModelReader};

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Model directory containing the entry-point file
    #[arg(value_name = "MODEL_DIR")]
    pub model_dir: PathBuf,

    /// Entry-point file inside the model directory
    #[arg(long, value_name = "FILE", default_value = DEFAULT_ENTRY_POINT)]
    pub entry_point: String,

    /// Write JSON to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Execute the convert command
pub fn execute(args: ConvertArgs) -> Result<()> {
    let entry_point = args.model_dir.join(&args.entry_point);
    let model = DssReader::new()
        .read(&entry_point)
        .with_context(|| format!("Converting {}", args.model_dir.display()))?;

    match args.output {
        Some(path) => {
            model.to_json_file(&path)?;
            eprintln!(
                "Wrote {} components of circuit '{}' to {}",
                model.components.len(),
                model.name,
                path.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            model.write_json(&mut handle)?;
            writeln!(handle)?;
        }
    }

    Ok(())
}
