//! List command implementation
//!
//! Shows the model directories a publish run would convert, in conversion
//! order, and flags the ones missing their entry point.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use feeder_publish::config::{DEFAULT_ENTRY_POINT, DEFAULT_MODELS_ROOT};
use feeder_publish::phases::discovery;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Directory whose subdirectories are feeder models
    #[arg(short, long, value_name = "PATH", env = "FEEDER_MODELS", default_value = DEFAULT_MODELS_ROOT)]
    pub models: PathBuf,

    /// Entry-point file inside each model directory
    #[arg(long, value_name = "FILE", default_value = DEFAULT_ENTRY_POINT)]
    pub entry_point: String,
}

/// Execute the list command
pub fn execute(args: ListArgs) -> Result<()> {
    let models = discovery::discover_models(&args.models, &args.entry_point)?;

    if models.is_empty() {
        println!("No model directories in {}", args.models.display());
        return Ok(());
    }

    let width = models.iter().map(|m| m.name.len()).max().unwrap_or(0);
    for model in &models {
        let marker = if model.has_entry_point() {
            ""
        } else {
            "  (missing entry point)"
        };
        println!(
            "{:width$}  {}{}",
            model.name,
            model.entry_point.display(),
            marker,
            width = width
        );
    }
    println!();
    println!("{} model directories", models.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_execute_lists_models() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("feederA")).unwrap();

        let args = ListArgs {
            models: temp.path().to_path_buf(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        };
        assert!(execute(args).is_ok());
    }

    #[test]
    fn test_execute_missing_root() {
        let temp = TempDir::new().unwrap();
        let args = ListArgs {
            models: temp.path().join("missing"),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        };
        assert!(execute(args).is_err());
    }
}
