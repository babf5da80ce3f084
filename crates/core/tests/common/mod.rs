//! Shared test helpers for core integration tests.

use async_trait::async_trait;
use scriptrunner_core::errors::ScriptError;
use scriptrunner_core::exec::{ExecutionPath, ExecutionStrategy, ScriptExecutor};
use scriptrunner_core::ScriptDeclaration;
use std::sync::{Arc, Mutex};

/// Executor double that records which path ran which command line
#[allow(dead_code)]
pub struct RecordingExecutor {
    pub path: ExecutionPath,
    pub calls: Arc<Mutex<Vec<(ExecutionPath, String)>>>,
}

#[async_trait]
impl ScriptExecutor for RecordingExecutor {
    async fn execute(&self, script: &ScriptDeclaration) -> Result<(), ScriptError> {
        self.calls
            .lock()
            .unwrap()
            .push((self.path, script.command_line()));
        Ok(())
    }
}

/// Strategy for `path` whose executors record into the returned log
#[allow(dead_code)]
pub fn recording_strategy(
    path: ExecutionPath,
) -> (ExecutionStrategy, Arc<Mutex<Vec<(ExecutionPath, String)>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let shell = RecordingExecutor {
        path: ExecutionPath::Shell,
        calls: calls.clone(),
    };
    let direct = RecordingExecutor {
        path: ExecutionPath::Direct,
        calls: calls.clone(),
    };
    (
        ExecutionStrategy::with_executors(path, Arc::new(shell), Arc::new(direct)),
        calls,
    )
}

/// Shell snippet appending `line` to the file at `path`
#[allow(dead_code)]
pub fn append_line(path: &std::path::Path, line: &str) -> String {
    format!("echo {} >> {}", line, path.display())
}
