//! Outputs command implementation
//!
//! Prints the records of a report file, optionally only those with a given
//! key. Multiline values are indented under their key.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use feeder_publish::report::{read_records, Record};

/// Arguments for the outputs command
#[derive(Args, Debug)]
pub struct OutputsArgs {
    /// Report file to read
    #[arg(value_name = "REPORT_FILE", env = "GITHUB_OUTPUT")]
    pub report: PathBuf,

    /// Only show records with this key
    #[arg(short, long, value_name = "KEY")]
    pub key: Option<String>,
}

/// Execute the outputs command
pub fn execute(args: OutputsArgs) -> Result<()> {
    let records = read_records(&args.report)?;

    for record in records
        .iter()
        .filter(|r| args.key.as_ref().is_none_or(|k| &r.key == k))
    {
        println!("{}", render(record));
    }

    Ok(())
}

fn render(record: &Record) -> String {
    if record.value.contains('\n') {
        let body: Vec<String> = record
            .value
            .split('\n')
            .map(|line| format!("    {}", line))
            .collect();
        format!("{}:\n{}", record.key, body.join("\n"))
    } else {
        format!("{}: {}", record.key, record.value)
    }
}
