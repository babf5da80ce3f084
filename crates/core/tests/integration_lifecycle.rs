//! Integration tests for phase execution with real processes
//!
//! Each script appends to a marker file so that ordering, repetition and
//! early termination can be observed from the outside.
//!
//! Note: These tests rely on `sh` and are only compiled on Unix systems.
#![cfg(unix)]

mod common;

use common::append_line;
use scriptrunner_core::config::{ConfigLoader, RunnerOptions};
use scriptrunner_core::errors::RunnerError;
use scriptrunner_core::exec::ExecutionStrategy;
use scriptrunner_core::platform::Platform;
use scriptrunner_core::{Phase, RunnerConfig, ScriptRunner};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn config_with(phase_key: &str, scripts: serde_json::Value, dev: bool) -> RunnerConfig {
    let mut raw = serde_json::Map::new();
    raw.insert(phase_key.to_string(), scripts);
    raw.insert("dev".to_string(), json!(dev));
    ConfigLoader::load_from_str(&serde_json::Value::Object(raw).to_string()).unwrap()
}

fn runner(config: &RunnerConfig, safe_mode: bool) -> ScriptRunner {
    let options = RunnerOptions {
        safe_mode,
        ..config.options()
    };
    let strategy = ExecutionStrategy::new(Platform::Linux, safe_mode);
    ScriptRunner::with_strategy(config, options, strategy)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn sh(script: String) -> serde_json::Value {
    json!({ "command": "sh", "args": ["-c", script] })
}

#[tokio::test]
async fn test_production_build_reruns_scripts_each_iteration() {
    scriptrunner_core::logging::init(None).ok();
    let temp_dir = TempDir::new().unwrap();
    let marker = temp_dir.path().join("marker");

    let config = config_with(
        "onBuildStart",
        json!([sh(append_line(&marker, "A")), sh(append_line(&marker, "B"))]),
        false,
    );
    let mut runner = runner(&config, false);

    runner.before_build().await.unwrap();
    runner.before_build().await.unwrap();

    assert_eq!(read_lines(&marker), vec!["A", "B", "A", "B"]);
}

#[tokio::test]
async fn test_development_build_fires_once_per_session() {
    scriptrunner_core::logging::init(None).ok();
    let temp_dir = TempDir::new().unwrap();
    let marker = temp_dir.path().join("marker");

    let config = config_with(
        "onBuildEnd",
        json!([sh(append_line(&marker, "A")), sh(append_line(&marker, "B"))]),
        true,
    );
    let mut runner = runner(&config, false);

    assert!(runner.after_emit().await.unwrap().is_some());
    assert!(runner.after_emit().await.unwrap().is_none());

    assert_eq!(read_lines(&marker), vec!["A", "B"]);
    assert!(runner.state().is_empty(Phase::AfterEmit));
}

#[tokio::test]
async fn test_failing_script_aborts_remaining_scripts() {
    scriptrunner_core::logging::init(None).ok();
    let temp_dir = TempDir::new().unwrap();
    let marker = temp_dir.path().join("marker");

    let config = config_with(
        "onBuildStart",
        json!([
            sh(append_line(&marker, "first")),
            sh("exit 5".to_string()),
            sh(append_line(&marker, "never")),
        ]),
        true,
    );
    let mut runner = runner(&config, false);

    let err = runner.before_build().await.unwrap_err();
    match &err {
        RunnerError::Phase { phase, index, .. } => {
            assert_eq!(*phase, Phase::BeforeBuild);
            assert_eq!(*index, 2);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.script_error().and_then(|e| e.exit_code()), Some(5));

    assert_eq!(read_lines(&marker), vec!["first"]);
    assert_eq!(runner.state().scripts(Phase::BeforeBuild).len(), 3);
}

#[tokio::test]
async fn test_safe_mode_runs_command_lines_through_shell() {
    scriptrunner_core::logging::init(None).ok();
    let temp_dir = TempDir::new().unwrap();
    let marker = temp_dir.path().join("marker");

    // One list entry containing a shell operator: only a shell honours it
    let line = format!(
        "{} && {}",
        append_line(&marker, "one"),
        append_line(&marker, "two")
    );
    let config = config_with("onBuildExit", json!([line]), false);

    let mut safe = runner(&config, true);
    safe.on_exit().await.unwrap();
    assert_eq!(read_lines(&marker), vec!["one", "two"]);
}

#[tokio::test]
async fn test_missing_executable_is_spawn_failure() {
    scriptrunner_core::logging::init(None).ok();
    let config = config_with(
        "onBuildStart",
        json!(["definitely-not-a-real-binary-3f9a --flag"]),
        false,
    );
    let mut runner = runner(&config, false);

    let err = runner.before_build().await.unwrap_err();
    assert!(matches!(
        err.script_error(),
        Some(scriptrunner_core::errors::ScriptError::Spawn { .. })
    ));
}
