//! End-to-end smoke tests for the drive-mirror binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_shows_flags() {
    Command::cargo_bin("drive-mirror")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--root"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--ledger"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("drive-mirror")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("drive-mirror"));
}

#[test]
fn test_missing_credential_aborts_before_traversal() {
    // No env token and no token.json in the working directory: the process
    // must exit non-zero without creating the output directory.
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin("drive-mirror")
        .unwrap()
        .current_dir(temp_dir.path())
        .env_remove("DRIVE_ACCESS_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no credential found"));

    assert!(!temp_dir.path().join("Downloaded_Drive").exists());
}

#[test]
fn test_malformed_token_file_aborts() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("token.json"), "{not json").unwrap();

    Command::cargo_bin("drive-mirror")
        .unwrap()
        .current_dir(temp_dir.path())
        .env_remove("DRIVE_ACCESS_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed token file"));
}
