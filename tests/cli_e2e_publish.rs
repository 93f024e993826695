//! End-to-end tests for the `publish` command.
//!
//! These run the compiled binary the way CI does and check the output tree
//! and the report file.

mod common;

use common::prelude::*;

#[test]
fn test_publish_success_scenario() {
    let fixture = TestFixture::new()
        .with_feeder("feederA", models::FEEDER_A)
        .with_feeder("feederB", models::FEEDER_B);

    fixture
        .publish_command("1.2.3")
        .assert()
        .success()
        .stdout(predicate::str::contains("Published"));

    fixture
        .child("data/1_2_3/feederA.json")
        .assert(predicate::path::is_file());
    fixture
        .child("data/1_2_3/feederB.json")
        .assert(predicate::path::is_file());

    let report = fixture.report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 1);
    let suffix = lines[0].strip_prefix("branch=auto/1.2.3_").unwrap();
    assert_eq!(suffix.len(), 36, "expected a UUID suffix, got {suffix}");
}

#[test]
fn test_publish_failure_scenario() {
    let fixture = TestFixture::new()
        .with_feeder("feederA", models::FEEDER_A)
        .with_feeder("feederB", models::MALFORMED);

    fixture.publish_command("1.2.3").assert().success();

    fixture
        .child("data/1_2_3/feederA.json")
        .assert(predicate::path::is_file());
    fixture
        .child("data/1_2_3/feederB.json")
        .assert(predicate::path::missing());

    let report = fixture.report();
    assert!(report.starts_with("errormessage<<EOF\n"));
    assert!(report.ends_with("\nEOF\n"));
    assert!(report.contains("unknown command 'Frobnicate'"));
    assert!(!report.contains("branch="));
}

#[test]
fn test_publish_fail_on_error_sets_exit_code() {
    let fixture = TestFixture::new().with_feeder("feederB", models::MALFORMED);

    fixture
        .publish_command("1.2.3")
        .arg("--fail-on-error")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Frobnicate"));

    assert!(fixture.report().starts_with("errormessage<<EOF"));
}

#[test]
fn test_publish_twice_is_clean() {
    let fixture = TestFixture::new()
        .with_feeder("feederA", models::FEEDER_A)
        .with_file("data/1_2_3/stale.json", "{}");

    fixture.publish_command("1.2.3").assert().success();
    fixture.publish_command("1.2.3").assert().success();

    fixture
        .child("data/1_2_3/stale.json")
        .assert(predicate::path::missing());
    assert_eq!(
        TestFixture::file_names(&fixture.output_root().join("1_2_3")),
        vec!["feederA.json"]
    );
    assert_eq!(fixture.report().lines().count(), 2);
}

#[test]
fn test_publish_reads_environment() {
    let fixture = TestFixture::new().with_feeder("feederA", models::FEEDER_A);

    let mut cmd = cargo_bin_cmd!("feeder-publish");
    cmd.current_dir(fixture.path())
        .env_remove("FEEDER_PUBLISH_CONFIG")
        .env("INPUT_DATAPATH", fixture.output_root())
        .env("GITHUB_OUTPUT", fixture.report_path())
        .env("FEEDER_MODEL_VERSION", "2.0.1")
        .env_remove("FEEDER_MODELS")
        .arg("publish")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    // Models root defaults to ./opendss
    fixture
        .child("data/2_0_1/feederA.json")
        .assert(predicate::path::is_file());
    assert!(fixture.report().starts_with("branch=auto/2.0.1_"));
}

#[test]
fn test_publish_config_file() {
    let fixture = TestFixture::new()
        .with_feeder("feederA", models::FEEDER_A)
        .with_file(
            "feeder-publish.yaml",
            "output_root: data\nreport_path: github_output\nversion: \"4.5\"\n",
        );

    let mut cmd = cargo_bin_cmd!("feeder-publish");
    cmd.current_dir(fixture.path())
        .env_remove("GITHUB_OUTPUT")
        .env_remove("INPUT_DATAPATH")
        .env_remove("FEEDER_MODELS")
        .env_remove("FEEDER_MODEL_VERSION")
        .arg("publish")
        .arg("--config")
        .arg("feeder-publish.yaml")
        .assert()
        .success();

    fixture
        .child("data/4_5/feederA.json")
        .assert(predicate::path::is_file());
}

#[test]
fn test_publish_missing_version_is_reported() {
    let fixture = TestFixture::new().with_feeder("feederA", models::FEEDER_A);

    let mut cmd = cargo_bin_cmd!("feeder-publish");
    cmd.current_dir(fixture.path())
        .env_remove("FEEDER_MODEL_VERSION")
        .env_remove("FEEDER_PUBLISH_CONFIG")
        .arg("publish")
        .arg("--output")
        .arg(fixture.output_root())
        .arg("--report")
        .arg(fixture.report_path())
        .assert()
        .success();

    let report = fixture.report();
    assert!(report.contains("missing required setting 'version'"));
    fixture.child("data").assert(predicate::path::missing());
}

#[test]
fn test_list_command() {
    let fixture = TestFixture::new()
        .with_feeder("feederB", models::FEEDER_B)
        .with_feeder("feederA", models::FEEDER_A);
    fixture
        .child("opendss/empty")
        .create_dir_all()
        .unwrap();

    let mut cmd = cargo_bin_cmd!("feeder-publish");
    cmd.current_dir(fixture.path())
        .env_remove("FEEDER_MODELS")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("feederA"))
        .stdout(predicate::str::contains("feederB"))
        .stdout(predicate::str::contains("missing entry point"))
        .stdout(predicate::str::contains("3 model directories"));
}

#[test]
fn test_convert_command_to_stdout() {
    let fixture = TestFixture::new().with_feeder("feederA", models::FEEDER_A);

    let mut cmd = cargo_bin_cmd!("feeder-publish");
    cmd.current_dir(fixture.path())
        .arg("convert")
        .arg("opendss/feederA")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"feederA\""))
        .stdout(predicate::str::contains("\"class\": \"load\""));
}

#[test]
fn test_outputs_command() {
    let fixture = TestFixture::new().with_file(
        "github_output",
        "branch=auto/1_x\nerrormessage<<EOF\nline one\nline two\nEOF\n",
    );

    let mut cmd = cargo_bin_cmd!("feeder-publish");
    cmd.current_dir(fixture.path())
        .arg("outputs")
        .arg("github_output")
        .arg("--key")
        .arg("errormessage")
        .assert()
        .success()
        .stdout(predicate::str::contains("    line two"))
        .stdout(predicate::str::contains("branch").not());
}
