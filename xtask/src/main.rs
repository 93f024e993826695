//! Development automation tasks for feeder-publish.
//!
//! # Usage
//!
//! ```bash
//! cargo xtask ci            # fmt check, clippy and tests, as CI runs them
//! cargo xtask coverage      # Run test coverage with cargo-tarpaulin
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development automation tasks for feeder-publish")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run test coverage with cargo-tarpaulin
    Coverage {
        /// Output format (html, json, xml, or lcov)
        #[arg(long, short, default_value = "html")]
        format: String,
        /// Minimum coverage threshold (0-100)
        #[arg(long)]
        fail_under: Option<u8>,
        /// Open HTML report in browser after completion
        #[arg(long)]
        open: bool,
    },
    /// Run the checks CI runs: fmt, clippy and the test suite
    Ci {
        /// Skip the formatting check
        #[arg(long)]
        no_fmt: bool,
        /// Do not turn clippy warnings into errors
        #[arg(long)]
        allow_warnings: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Find workspace root
    let workspace_root = workspace_root()?;
    env::set_current_dir(&workspace_root).with_context(|| {
        format!(
            "Failed to change to workspace root: {}",
            workspace_root.display()
        )
    })?;

    match cli.command {
        Commands::Coverage {
            format,
            fail_under,
            open,
        } => run_coverage(&format, fail_under, open),
        Commands::Ci {
            no_fmt,
            allow_warnings,
        } => run_ci(!no_fmt, !allow_warnings),
    }
}

/// Find the workspace root directory.
fn workspace_root() -> Result<PathBuf> {
    let output = Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("Failed to run 'cargo locate-project'")?;

    if !output.status.success() {
        bail!("Failed to locate workspace root");
    }

    let path = String::from_utf8(output.stdout).context("Invalid UTF-8 in cargo output")?;
    let path = PathBuf::from(path.trim());

    // The output is Cargo.toml path, we need the directory
    path.parent()
        .map(|p| p.to_path_buf())
        .context("Failed to get parent directory of Cargo.toml")
}

/// Run fmt, clippy and tests in order, stopping at the first failure.
fn run_ci(fmt: bool, deny_warnings: bool) -> Result<()> {
    if fmt {
        println!("==> cargo fmt --check");
        if !run_cargo(&["fmt", "--all", "--", "--check"])?.success() {
            bail!("Formatting check failed; run 'cargo fmt --all'");
        }
    }

    println!("==> cargo clippy");
    let mut clippy = vec!["clippy", "--workspace", "--all-targets"];
    if deny_warnings {
        clippy.extend(["--", "-D", "warnings"]);
    }
    if !run_cargo(&clippy)?.success() {
        bail!("clippy reported problems");
    }

    println!("==> cargo test");
    if !run_cargo(&["test", "--workspace"])?.success() {
        bail!("Tests failed");
    }

    println!();
    println!("All checks passed");
    Ok(())
}

/// Run test coverage with cargo-tarpaulin.
fn run_coverage(format: &str, fail_under: Option<u8>, open: bool) -> Result<()> {
    // Check if tarpaulin is installed
    if !is_command_available("cargo-tarpaulin") {
        println!("cargo-tarpaulin is not installed.");
        println!("Install with: cargo install cargo-tarpaulin");
        println!();
        println!("Note: cargo-tarpaulin only works on Linux x86_64.");
        bail!("cargo-tarpaulin not found");
    }

    let threshold = fail_under.map(|t| t.to_string());
    let mut args = vec!["tarpaulin"];

    // Set output format
    let out_format = match format.to_lowercase().as_str() {
        "html" => {
            args.push("--out");
            args.push("Html");
            Some("target/tarpaulin/tarpaulin-report.html")
        }
        "json" => {
            args.push("--out");
            args.push("Json");
            Some("target/tarpaulin/tarpaulin-report.json")
        }
        "xml" => {
            args.push("--out");
            args.push("Xml");
            Some("target/tarpaulin/cobertura.xml")
        }
        "lcov" => {
            args.push("--out");
            args.push("Lcov");
            Some("target/tarpaulin/lcov.info")
        }
        _ => {
            bail!("Unknown format '{}'. Use: html, json, xml, or lcov", format);
        }
    };

    if let Some(threshold) = &threshold {
        args.push("--fail-under");
        args.push(threshold);
    }

    println!("Running coverage...");
    let status = run_cargo(&args)?;

    if !status.success() {
        if fail_under.is_some() {
            bail!("Coverage is below the required threshold");
        }
        bail!("Coverage failed");
    }

    if let Some(report_path) = out_format {
        println!();
        println!("Coverage report: {}", report_path);

        if open && format == "html" {
            open_in_browser(report_path)?;
        }
    }

    Ok(())
}

/// Check if a command is available in PATH.
fn is_command_available(cmd: &str) -> bool {
    Command::new(cmd)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Run a cargo command.
fn run_cargo(args: &[&str]) -> Result<ExitStatus> {
    Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))
}

/// Open a file in the default browser.
fn open_in_browser(path: &str) -> Result<()> {
    #[cfg(target_os = "linux")]
    let cmd = "xdg-open";
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(target_os = "windows")]
    let cmd = "start";

    Command::new(cmd)
        .arg(path)
        .spawn()
        .context("Failed to open browser")?;

    Ok(())
}
