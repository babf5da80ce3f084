//! Tests for the single-phase `run` command.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_run_executes_phase_scripts_in_order() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("scriptrunner.jsonc"),
        r#"{
    // clean and announce
    "onBuildExit": "echo first && echo second",
}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("scriptrunner").unwrap();
    cmd.arg("--workspace-folder")
        .arg(temp_dir.path())
        .args(["run", "on-exit"])
        .assert()
        .success()
        .stdout("first\nsecond\n")
        .stderr(predicate::str::contains(
            "Executing additional scripts before exit",
        ));
}

#[test]
fn test_run_propagates_script_exit_code() {
    let temp_dir = TempDir::new().unwrap();
    let marker = temp_dir.path().join("marker");
    let config = serde_json::json!({
        "onBuildEnd": [
            { "command": "sh", "arguments": ["-c", "exit 7"] },
            { "command": "touch", "args": [marker.display().to_string()] }
        ]
    });
    fs::write(temp_dir.path().join("scriptrunner.json"), config.to_string()).unwrap();

    let mut cmd = Command::cargo_bin("scriptrunner").unwrap();
    cmd.arg("--workspace-folder")
        .arg(temp_dir.path())
        .args(["run", "after-emit"])
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("exited with code 7"));

    assert!(!marker.exists());
}

#[test]
fn test_run_with_explicit_config_path() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("lifecycle.toml");
    fs::write(&config_path, "onBuildStart = [\"echo from-toml\"]\n").unwrap();

    let mut cmd = Command::cargo_bin("scriptrunner").unwrap();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["run", "before-build"])
        .assert()
        .success()
        .stdout("from-toml\n");
}

#[test]
fn test_run_with_empty_phase_does_nothing() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("scriptrunner.json"),
        r#"{ "onBuildStart": ["echo pre"] }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("scriptrunner").unwrap();
    cmd.arg("--workspace-folder")
        .arg(temp_dir.path())
        .args(["run", "after-emit"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Executing post-build scripts").not());
}

#[test]
fn test_verbose_logs_each_script() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("scriptrunner.json"),
        r#"{ "onBuildStart": ["echo pre"] }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("scriptrunner").unwrap();
    cmd.arg("--workspace-folder")
        .arg(temp_dir.path())
        .args(["--verbose", "run", "before-build"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[before-build] echo pre"));
}

#[test]
fn test_shell_path_forwards_stderr_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("scriptrunner.json"),
        r#"{ "onBuildStart": ["echo err 1>&2"] }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("scriptrunner").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("SCRIPTRUNNER_LOG")
        .arg("--workspace-folder")
        .arg(temp_dir.path())
        .args(["--safe", "--log-level", "error", "run", "before-build"])
        .assert()
        .success()
        .stdout("err\n")
        .stderr("");
}

#[test]
fn test_direct_path_leaves_stderr_on_stderr() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("scriptrunner.json"),
        r#"{ "onBuildStart": [{ "command": "sh", "args": ["-c", "echo err 1>&2"] }] }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("scriptrunner").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("SCRIPTRUNNER_LOG")
        .arg("--workspace-folder")
        .arg(temp_dir.path())
        .args(["--log-level", "error", "run", "before-build"])
        .assert()
        .success()
        .stdout("")
        .stderr("err\n");
}
