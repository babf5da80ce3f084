//! Run command implementation
//!
//! Runs the scripts declared for a single phase once.

use crate::cli::OptionOverrides;
use crate::commands::shared::{load_config, ConfigLoadArgs};
use anyhow::Result;
use scriptrunner_core::{Phase, ScriptRunner};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Run command arguments
#[derive(Debug, Clone)]
pub struct RunArgs<'a> {
    pub phase: Phase,
    pub workspace_folder: Option<&'a Path>,
    pub config_path: Option<&'a Path>,
    pub overrides: OptionOverrides,
}

/// Execute the run command
#[instrument(skip(args), fields(phase = %args.phase))]
pub async fn execute_run(args: RunArgs<'_>) -> Result<()> {
    let loaded = load_config(ConfigLoadArgs {
        workspace_folder: args.workspace_folder,
        config_path: args.config_path,
        overrides: args.overrides,
    })?;
    debug!("Loaded configuration from {}", loaded.config_path.display());

    let mut runner = ScriptRunner::with_options(&loaded.config, loaded.options);
    match runner.run(args.phase).await? {
        Some(report) => info!(
            "Ran {} script(s) for {} in {:?}",
            report.executed(),
            args.phase,
            report.total_duration()
        ),
        None => debug!("No scripts declared for {}", args.phase),
    }

    Ok(())
}
