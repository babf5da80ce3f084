//! Build command implementation
//!
//! Drives a build command through the lifecycle a host build tool would
//! notify: before-build, the build itself, after-emit, and once at the end
//! on-exit. Several iterations stand in for a watch session.

use crate::cli::OptionOverrides;
use crate::commands::shared::{load_config, ConfigLoadArgs};
use anyhow::{Context, Result};
use scriptrunner_core::{ScriptDeclaration, ScriptRunner};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Build command arguments
#[derive(Debug, Clone)]
pub struct BuildArgs<'a> {
    pub iterations: u32,
    pub command: Vec<String>,
    pub workspace_folder: Option<&'a Path>,
    pub config_path: Option<&'a Path>,
    pub overrides: OptionOverrides,
}

/// Execute the build command
#[instrument(skip(args), fields(iterations = args.iterations))]
pub async fn execute_build(args: BuildArgs<'_>) -> Result<()> {
    let Some((program, program_args)) = args.command.split_first() else {
        anyhow::bail!("No build command given");
    };
    let build = ScriptDeclaration::structured(program.as_str(), program_args.iter().cloned());

    let loaded = load_config(ConfigLoadArgs {
        workspace_folder: args.workspace_folder,
        config_path: args.config_path,
        overrides: args.overrides,
    })?;
    debug!("Loaded configuration from {}", loaded.config_path.display());

    let mut runner = ScriptRunner::with_options(&loaded.config, loaded.options);

    let mut build_failure = None;
    for iteration in 1..=args.iterations {
        debug!("Starting build iteration {}/{}", iteration, args.iterations);
        runner.before_build().await?;

        if let Err(err) = runner.strategy().execute(&build).await {
            warn!("Build command failed in iteration {}: {}", iteration, err);
            build_failure = Some(err);
            break;
        }

        runner.after_emit().await?;
    }

    let exit_result = runner.on_exit().await;

    if let Some(err) = build_failure {
        // the build failure decides the outcome
        if let Err(exit_err) = exit_result {
            warn!("on-exit scripts failed after build failure: {}", exit_err);
        }
        return Err(err).with_context(|| format!("Build command '{}' failed", build));
    }
    exit_result?;

    info!("Build finished after {} iteration(s)", args.iterations);
    Ok(())
}
