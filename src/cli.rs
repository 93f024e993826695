//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Feeder Publish - Convert OpenDSS feeder models into versioned JSON artifacts
#[derive(Parser, Debug)]
#[command(name = "feeder-publish")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every model directory and report the outcome for CI
    Publish(commands::publish::PublishArgs),

    /// List the model directories a publish run would convert
    List(commands::list::ListArgs),

    /// Convert a single model directory to JSON
    Convert(commands::convert::ConvertArgs),

    /// Show the records of a report file
    Outputs(commands::outputs::OutputsArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Publish(args) => commands::publish::execute(args),
            Commands::List(args) => commands::list::execute(args),
            Commands::Convert(args) => commands::convert::execute(args),
            Commands::Outputs(args) => commands::outputs::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Send `log` records to stderr. `RUST_LOG`, when set, takes precedence over
/// `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when commands run inside tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}
