//! Shared test utilities for integration and E2E tests.
//!
//! This module provides fixtures and helpers for building models roots,
//! reading report files and running the `feeder-publish` binary.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_feeder("feederA", models::FEEDER_A);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::models;
    pub use super::TestFixture;
}

/// OpenDSS scripts used across tests.
#[allow(dead_code)]
pub mod models {
    /// Small radial feeder.
    pub const FEEDER_A: &str = r#"Clear
New Circuit.feederA basekv=12.47 pu=1.0 phases=3
New Line.L1 bus1=sourcebus bus2=b2 length=0.5 units=km
~ r1=0.1 x1=0.2
New Load.house1 bus1=b2.1 kv=7.2 kw=5 pf=0.95
Set voltagebases=[12.47]
Calcvoltagebases
Solve
"#;

    /// Feeder with a transformer.
    pub const FEEDER_B: &str = r#"Clear
New Circuit.feederB basekv=4.16
New Transformer.T1 phases=3 windings=2 buses=(sourcebus, lv) kvs=(4.16, 0.48)
New Load.shop bus1=lv kv=0.48 kw=40
Solve
"#;

    /// Script the reader rejects on line 3.
    pub const MALFORMED: &str = r#"Clear
New Circuit.broken
Frobnicate everything
"#;
}

/// A temporary workspace with a models root, an output root and a report file.
///
/// ```text
/// <tmp>/opendss/<feeder>/Master.dss
/// <tmp>/data/                  (output root)
/// <tmp>/github_output          (report file)
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a fixture with an empty models root.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("opendss")
            .create_dir_all()
            .expect("Failed to create models root");
        Self { temp_dir }
    }

    /// Add a feeder directory with a `Master.dss` entry point.
    pub fn with_feeder(self, name: &str, script: &str) -> Self {
        self.temp_dir
            .child("opendss")
            .child(name)
            .child("Master.dss")
            .write_str(script)
            .expect("Failed to write model");
        self
    }

    /// Add an extra file inside a feeder directory.
    pub fn with_model_file(self, feeder: &str, file: &str, content: &str) -> Self {
        self.temp_dir
            .child("opendss")
            .child(feeder)
            .child(file)
            .write_str(content)
            .expect("Failed to write model file");
        self
    }

    /// Add a file at `path` relative to the fixture root.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A child path of the fixture root, for `assert_fs` assertions.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    pub fn models_root(&self) -> PathBuf {
        self.path().join("opendss")
    }

    pub fn output_root(&self) -> PathBuf {
        self.path().join("data")
    }

    pub fn report_path(&self) -> PathBuf {
        self.path().join("github_output")
    }

    /// Contents of the report file, or an empty string if it does not exist.
    pub fn report(&self) -> String {
        std::fs::read_to_string(self.report_path()).unwrap_or_default()
    }

    /// Sorted file names directly inside `dir`.
    pub fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read directory")
            .map(|e| e.expect("Bad entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// A `feeder-publish publish` command wired to this fixture.
    ///
    /// Environment fallbacks are cleared so the host CI environment cannot
    /// leak into the test.
    pub fn publish_command(&self, version: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("feeder-publish");
        cmd.current_dir(self.path())
            .env_remove("GITHUB_OUTPUT")
            .env_remove("INPUT_DATAPATH")
            .env_remove("FEEDER_MODELS")
            .env_remove("FEEDER_MODEL_VERSION")
            .env_remove("FEEDER_PUBLISH_CONFIG")
            .env_remove("RUST_LOG")
            .arg("publish")
            .arg("--models")
            .arg(self.models_root())
            .arg("--output")
            .arg(self.output_root())
            .arg("--report")
            .arg(self.report_path())
            .arg("--model-version")
            .arg(version);
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
