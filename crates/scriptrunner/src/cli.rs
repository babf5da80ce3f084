use crate::commands::build::{execute_build, BuildArgs};
use crate::commands::run::{execute_run, RunArgs};
use crate::commands::show::{execute_show, ShowArgs};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use scriptrunner_core::Phase;
use std::path::PathBuf;

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log format options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON structured format
    Json,
}

/// Log level options
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warning and error messages
    Warn,
    /// Informational messages and above
    Info,
    /// Debug messages and above
    Debug,
    /// All messages including trace
    Trace,
}

/// CLI-facing phase names
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PhaseArg {
    /// Before compilation starts
    BeforeBuild,
    /// After build output has been emitted
    AfterEmit,
    /// After the build run has finished
    OnExit,
}

impl From<PhaseArg> for Phase {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::BeforeBuild => Phase::BeforeBuild,
            PhaseArg::AfterEmit => Phase::AfterEmit,
            PhaseArg::OnExit => Phase::OnExit,
        }
    }
}

/// Option overrides given on the command line.
///
/// These take precedence over the values in the configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub development_mode: Option<bool>,
    pub safe_mode: bool,
    pub verbose: bool,
}

/// Global options available to all subcommands
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Workspace folder path
    pub workspace_folder: Option<PathBuf>,
    /// Configuration file path
    pub config: Option<PathBuf>,
    /// Runner option overrides
    pub overrides: OptionOverrides,
}

/// scriptrunner subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the scripts of a single phase once
    Run {
        /// Phase whose scripts should run
        #[arg(value_enum)]
        phase: PhaseArg,
    },

    /// Run a build command with lifecycle scripts around it
    #[command(long_about = "Run a build command with lifecycle scripts around it\n\n\
        Each iteration runs the before-build scripts, then the build command, then the \
        after-emit scripts when the build succeeded. The on-exit scripts run once after the \
        last iteration or after a failed build. In development mode the before-build and \
        after-emit scripts only run during the first iteration.")]
    Build {
        /// Number of build iterations to simulate a watch session
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        iterations: u32,

        /// Build command and its arguments
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },

    /// Show the resolved configuration and execution plan
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        output_format: OutputFormat,
    },
}

#[derive(Parser, Debug)]
#[command(name = "scriptrunner")]
#[command(about = "Run user scripts at build lifecycle phases")]
#[command(
    long_about = "Run user scripts at build lifecycle phases.\n\n\
    Scripts are declared per phase (onBuildStart, onBuildEnd, onBuildExit) in a \
    scriptrunner.json, scriptrunner.jsonc, .scriptrunner.json or scriptrunner.toml file."
)]
#[command(version)]
pub struct Cli {
    /// Log format (text or json, defaults to text, can be set via SCRIPTRUNNER_LOG_FORMAT env var)
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Workspace folder path
    #[arg(long, global = true, value_name = "PATH")]
    pub workspace_folder: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run every script through the platform shell
    #[arg(long, global = true)]
    pub safe: bool,

    /// Development mode: before-build and after-emit scripts run once per session
    #[arg(long, global = true, value_name = "BOOL")]
    pub dev: Option<bool>,

    /// Log each script before it runs
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Dispatch the CLI command
    pub async fn dispatch(self) -> Result<()> {
        let log_format = match self.log_format {
            Some(LogFormat::Text) => Some("text"),
            Some(LogFormat::Json) => Some("json"),
            None => None,
        };

        let log_level = match self.log_level {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        if std::env::var_os(scriptrunner_core::logging::LOG_FILTER_ENV).is_none()
            && std::env::var_os("RUST_LOG").is_none()
        {
            std::env::set_var(
                "RUST_LOG",
                format!("scriptrunner={},scriptrunner_core={}", log_level, log_level),
            );
        }
        scriptrunner_core::logging::init(log_format)?;

        tracing::debug!("CLI initialized with log level: {}", log_level);

        let context = CliContext {
            workspace_folder: self.workspace_folder,
            config: self.config,
            overrides: OptionOverrides {
                development_mode: self.dev,
                safe_mode: self.safe,
                verbose: self.verbose,
            },
        };

        match self.command {
            Some(Commands::Run { phase }) => {
                execute_run(RunArgs {
                    phase: phase.into(),
                    workspace_folder: context.workspace_folder.as_deref(),
                    config_path: context.config.as_deref(),
                    overrides: context.overrides,
                })
                .await
            }
            Some(Commands::Build {
                iterations,
                command,
            }) => {
                execute_build(BuildArgs {
                    iterations,
                    command,
                    workspace_folder: context.workspace_folder.as_deref(),
                    config_path: context.config.as_deref(),
                    overrides: context.overrides,
                })
                .await
            }
            Some(Commands::Show { output_format }) => execute_show(ShowArgs {
                output_format,
                workspace_folder: context.workspace_folder.as_deref(),
                config_path: context.config.as_deref(),
                overrides: context.overrides,
            }),
            None => {
                println!("Build lifecycle script runner");
                println!("Run 'scriptrunner --help' to see available commands.");
                Ok(())
            }
        }
    }
}
