//! # Outcome Reporting
//!
//! A run communicates its result to the CI orchestrator through a key/value
//! report file (the GitHub Actions `GITHUB_OUTPUT` format). Every write opens
//! the file in append mode, so records accumulate and a file pre-created by
//! the caller is kept.
//!
//! Two record shapes exist:
//!
//! ```text
//! branch=auto/1.2.3_8c1f...
//! errormessage<<EOF
//! Model parse error at feederB/Master.dss:4: unknown command 'Frobnicate'
//! EOF
//! ```
//!
//! The first is for short single-line values, the second for anything that
//! may span lines, such as a failure trace. A run writes exactly one of
//! `branch` or `errormessage`, chosen by its [`RunOutcome`].

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Key of the success record.
pub const BRANCH_KEY: &str = "branch";

/// Key of the failure record.
pub const ERROR_KEY: &str = "errormessage";

/// Line that closes a multiline record.
pub const DELIMITER: &str = "EOF";

/// Result of one publish run, as reported to CI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// All models converted; CI should push to `branch`.
    Success { branch: String },
    /// The run stopped; `trace` is the rendered error and its causes.
    Failure { trace: String },
}

impl RunOutcome {
    /// Render `err` with its full cause chain as a failure outcome.
    pub fn failure(err: impl Into<anyhow::Error>) -> Self {
        let err: anyhow::Error = err.into();
        RunOutcome::Failure {
            trace: format!("{:?}", err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success { .. })
    }
}

/// One record read back from a report file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub value: String,
}

/// Appends records to a report file.
#[derive(Debug, Clone)]
pub struct Reporter {
    path: PathBuf,
}

impl Reporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `key=value`. `value` must fit on one line.
    pub fn report_single(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        if value.contains(['\n', '\r']) {
            return Err(Error::Report {
                key: key.to_string(),
                message: "single-line value contains a line break".to_string(),
            });
        }
        self.append(key, &format!("{}={}\n", key, value))
    }

    /// Append `value` verbatim between `key<<EOF` and a closing `EOF` line.
    pub fn report_multiline(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        if value.split('\n').any(|line| line == DELIMITER) {
            return Err(Error::Report {
                key: key.to_string(),
                message: format!("value contains a line equal to the '{}' delimiter", DELIMITER),
            });
        }
        self.append(
            key,
            &format!("{}<<{}\n{}\n{}\n", key, DELIMITER, value, DELIMITER),
        )
    }

    /// Write the record for `outcome`: `branch` on success, `errormessage`
    /// on failure. A trace line equal to the delimiter is written with a
    /// leading space so the failure record is never refused.
    pub fn report_outcome(&self, outcome: &RunOutcome) -> Result<()> {
        match outcome {
            RunOutcome::Success { branch } => self.report_single(BRANCH_KEY, branch),
            RunOutcome::Failure { trace } => {
                self.report_multiline(ERROR_KEY, &escape_delimiter(trace))
            }
        }
    }

    fn append(&self, key: &str, record: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::Report {
                key: key.to_string(),
                message: format!("cannot open '{}': {}", self.path.display(), e),
            })?;
        file.write_all(record.as_bytes()).map_err(|e| Error::Report {
            key: key.to_string(),
            message: format!("cannot write '{}': {}", self.path.display(), e),
        })
    }
}

fn escape_delimiter(value: &str) -> String {
    value
        .split('\n')
        .map(|line| {
            if line == DELIMITER {
                format!(" {}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || key.contains(['=', '\n', '\r']) || key.contains("<<") {
        return Err(Error::Report {
            key: key.to_string(),
            message: "invalid key".to_string(),
        });
    }
    Ok(())
}

/// Parse the records of a report file's content, in file order.
pub fn parse_records(content: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut lines = content.split('\n').peekable();

    while let Some(line) = lines.next() {
        if line.is_empty() {
            continue;
        }

        if let Some((key, delimiter)) = line.split_once("<<") {
            let mut body = Vec::new();
            loop {
                match lines.next() {
                    Some(l) if l == delimiter => break,
                    Some(l) => body.push(l),
                    None => {
                        return Err(Error::Report {
                            key: key.to_string(),
                            message: format!("missing closing '{}' line", delimiter),
                        })
                    }
                }
            }
            records.push(Record {
                key: key.to_string(),
                value: body.join("\n"),
            });
        } else if let Some((key, value)) = line.split_once('=') {
            records.push(Record {
                key: key.to_string(),
                value: value.to_string(),
            });
        } else {
            return Err(Error::Report {
                key: line.to_string(),
                message: "line is neither key=value nor key<<DELIMITER".to_string(),
            });
        }
    }

    Ok(records)
}

/// Read and parse a report file.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}
