//! Error types and handling
//!
//! The error taxonomy is split into domain enums (configuration, script
//! execution) that are wrapped in the main `RunnerError` enum. Script failures
//! are always fatal for the phase that raised them; nothing in this crate
//! retries or recovers from them.

use crate::phase::Phase;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file parsing error
    #[error("Failed to parse configuration file: {message}")]
    Parsing { message: String },

    /// Configuration validation error
    #[error("Configuration validation error: {message}")]
    Validation { message: String },

    /// Configuration file I/O error
    #[error("Failed to read configuration file")]
    Io(#[from] std::io::Error),

    /// More than one candidate configuration file in the workspace
    #[error("Multiple scriptrunner configurations found. Use --config to specify one:\n{}",
        paths.iter().map(|p| format!("  {}", p)).collect::<Vec<_>>().join("\n"))]
    MultipleConfigs { paths: Vec<String> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },
}

/// Failures of a single spawned script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The process could not be started at all
    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited with a non-zero code
    #[error("'{command}' exited with code {code}")]
    ExitStatus { command: String, code: i32 },

    /// The process was terminated without an exit code (e.g. by a signal)
    #[error("'{command}' was terminated abnormally")]
    Terminated { command: String },

    /// Waiting on the process or forwarding its output failed
    #[error("I/O error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptError {
    /// Exit code reported by the child, if it exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ScriptError::ExitStatus { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A script failed outside of any phase context
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// A script failed while running a lifecycle phase
    #[error("Script {index} of phase {phase} failed ({script}): {source}")]
    Phase {
        phase: Phase,
        /// 1-based position of the script within the phase
        index: usize,
        /// The script as declared
        script: String,
        #[source]
        source: ScriptError,
    },
}

impl RunnerError {
    /// The underlying script failure, if this error came from a spawned process
    pub fn script_error(&self) -> Option<&ScriptError> {
        match self {
            RunnerError::Script(e) => Some(e),
            RunnerError::Phase { source, .. } => Some(source),
            RunnerError::Config(_) => None,
        }
    }
}

/// Convenience type alias for Results with RunnerError
pub type Result<T> = std::result::Result<T, RunnerError>;
