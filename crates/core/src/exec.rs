//! Script execution strategies
//!
//! Two ways to start a script:
//!
//! - **Shell**: the unsplit command line, quoted for the target interpreter,
//!   goes to the platform shell (`sh -c` / `cmd /C`). The child's stdout and
//!   stderr are piped and both re-emitted on the parent's stdout.
//! - **Direct**: the normalized command is spawned without a shell and
//!   inherits the parent's standard streams.
//!
//! [`select_path`] picks one from the platform and the safe-mode flag;
//! [`ExecutionStrategy`] applies that choice per script. Every execution is
//! awaited until the child exits.

use crate::errors::ScriptError;
use crate::platform::Platform;
use crate::script::ScriptDeclaration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, instrument};

/// How a script is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPath {
    /// Through the platform command interpreter
    Shell,
    /// Spawned directly, no intermediate interpreter
    Direct,
}

impl ExecutionPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionPath::Shell => "shell",
            ExecutionPath::Direct => "direct",
        }
    }
}

impl fmt::Display for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Choose the execution path for a platform and safe-mode setting
pub fn select_path(platform: Platform, safe_mode: bool) -> ExecutionPath {
    if platform.is_shell_dependent() || safe_mode {
        ExecutionPath::Shell
    } else {
        ExecutionPath::Direct
    }
}

/// Runs one script to completion
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    /// Start `script` and wait for it to exit.
    ///
    /// Returns an error if the process cannot be started or does not exit
    /// successfully.
    async fn execute(&self, script: &ScriptDeclaration) -> Result<(), ScriptError>;
}

/// Runs scripts through the platform shell
#[derive(Debug, Clone, Copy)]
pub struct ShellExecutor {
    platform: Platform,
}

impl ShellExecutor {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl ScriptExecutor for ShellExecutor {
    #[instrument(skip(self, script), fields(path = "shell"))]
    async fn execute(&self, script: &ScriptDeclaration) -> Result<(), ScriptError> {
        let line = script.shell_line(self.platform);
        let (program, flag) = self.platform.shell();
        debug!("Running via {} {}: {}", program, flag, line);

        let mut command = Command::new(program);
        command.arg(flag);
        // cmd.exe does its own parsing of everything after /C
        #[cfg(windows)]
        command.raw_arg(&line);
        #[cfg(not(windows))]
        command.arg(&line);

        let mut child = command
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ScriptError::Spawn {
                command: line.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (out, err) = tokio::join!(forward_to_stdout(stdout), forward_to_stdout(stderr));

        let status = child.wait().await.map_err(|source| ScriptError::Io {
            command: line.clone(),
            source,
        })?;
        out.and(err).map_err(|source| ScriptError::Io {
            command: line.clone(),
            source,
        })?;

        check_status(line, status)
    }
}

/// Spawns the normalized command without a shell
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectExecutor;

#[async_trait]
impl ScriptExecutor for DirectExecutor {
    #[instrument(skip(self, script), fields(path = "direct"))]
    async fn execute(&self, script: &ScriptDeclaration) -> Result<(), ScriptError> {
        let normalized = script.normalize();
        let line = script.command_line();
        debug!(
            "Spawning {} with args: {:?}",
            normalized.command, normalized.args
        );

        let mut child = Command::new(&normalized.command)
            .args(&normalized.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ScriptError::Spawn {
                command: line.clone(),
                source,
            })?;

        let status = child.wait().await.map_err(|source| ScriptError::Io {
            command: line.clone(),
            source,
        })?;

        check_status(line, status)
    }
}

/// Copy a child stream into the parent's stdout until EOF
async fn forward_to_stdout<R>(stream: Option<R>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = stream else {
        return Ok(());
    };
    let mut stdout = tokio::io::stdout();
    tokio::io::copy(&mut stream, &mut stdout).await?;
    stdout.flush().await
}

fn check_status(command: String, status: ExitStatus) -> Result<(), ScriptError> {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(ScriptError::ExitStatus { command, code }),
        None => Err(ScriptError::Terminated { command }),
    }
}

/// Applies the selected execution path to each script
#[derive(Clone)]
pub struct ExecutionStrategy {
    path: ExecutionPath,
    shell: Arc<dyn ScriptExecutor>,
    direct: Arc<dyn ScriptExecutor>,
}

impl ExecutionStrategy {
    /// Strategy backed by real process spawning
    pub fn new(platform: Platform, safe_mode: bool) -> Self {
        Self {
            path: select_path(platform, safe_mode),
            shell: Arc::new(ShellExecutor::new(platform)),
            direct: Arc::new(DirectExecutor),
        }
    }

    /// Strategy with caller-supplied executors for each path
    pub fn with_executors(
        path: ExecutionPath,
        shell: Arc<dyn ScriptExecutor>,
        direct: Arc<dyn ScriptExecutor>,
    ) -> Self {
        Self {
            path,
            shell,
            direct,
        }
    }

    pub fn path(&self) -> ExecutionPath {
        self.path
    }

    /// Run one script on the selected path
    pub async fn execute(&self, script: &ScriptDeclaration) -> Result<(), ScriptError> {
        match self.path {
            ExecutionPath::Shell => self.shell.execute(script).await,
            ExecutionPath::Direct => self.direct.execute(script).await,
        }
    }
}

impl fmt::Debug for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionStrategy")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
