//! # Feeder Publish CLI
//!
//! This is the binary entry point for the `feeder-publish` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments (and their environment fallbacks) using
//!   `clap`.
//! - Initialising logging.
//! - Executing the selected command and translating errors into a non-zero
//!   exit status.
//!
//! The pipeline itself lives in the `feeder_publish` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
