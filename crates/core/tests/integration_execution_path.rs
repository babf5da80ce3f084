//! Execution path selection observed through recording executors

mod common;

use common::recording_strategy;
use scriptrunner_core::config::ConfigLoader;
use scriptrunner_core::exec::{select_path, ExecutionPath};
use scriptrunner_core::platform::Platform;
use scriptrunner_core::ScriptRunner;

const CONFIG: &str = r#"{
    "onBuildStart": ["echo plain", { "command": "echo", "args": ["structured arg"] }],
    "onBuildEnd": "echo A && echo B",
    "onBuildExit": ["echo bye"],
    "dev": false
}"#;

async fn run_all_phases(platform: Platform, safe_mode: bool) -> Vec<(ExecutionPath, String)> {
    let config = ConfigLoader::load_from_str(CONFIG).unwrap();
    let mut options = config.options();
    options.safe_mode = safe_mode;

    let (strategy, calls) = recording_strategy(select_path(platform, safe_mode));
    let mut runner = ScriptRunner::with_strategy(&config, options, strategy);

    runner.before_build().await.unwrap();
    runner.after_emit().await.unwrap();
    runner.on_exit().await.unwrap();

    let recorded = calls.lock().unwrap().clone();
    recorded
}

#[tokio::test]
async fn test_shell_dependent_platform_uses_shell_for_every_script() {
    let calls = run_all_phases(Platform::Windows, false).await;
    assert_eq!(calls.len(), 5);
    assert!(calls.iter().all(|(path, _)| *path == ExecutionPath::Shell));
}

#[tokio::test]
async fn test_safe_mode_uses_shell_everywhere() {
    for platform in [Platform::Linux, Platform::MacOS] {
        let calls = run_all_phases(platform, true).await;
        assert!(calls.iter().all(|(path, _)| *path == ExecutionPath::Shell));
    }
}

#[tokio::test]
async fn test_unix_without_safe_mode_uses_direct_exec() {
    let calls = run_all_phases(Platform::Linux, false).await;
    let lines: Vec<&str> = calls.iter().map(|(_, l)| l.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "echo plain",
            "echo 'structured arg'",
            "echo A",
            "echo B",
            "echo bye"
        ]
    );
    assert!(calls.iter().all(|(path, _)| *path == ExecutionPath::Direct));
}
