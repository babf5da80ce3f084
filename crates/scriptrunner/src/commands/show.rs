//! Show command implementation
//!
//! Prints the resolved configuration: options in effect, the execution path
//! scripts will take on this platform and the normalized scripts per phase.

use crate::cli::{OptionOverrides, OutputFormat};
use crate::commands::shared::{load_config, ConfigLoadArgs};
use anyhow::Result;
use scriptrunner_core::exec::ExecutionPath;
use scriptrunner_core::platform::Platform;
use scriptrunner_core::{Phase, RunnerOptions, ScriptRunner};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Show command arguments
#[derive(Debug, Clone)]
pub struct ShowArgs<'a> {
    pub output_format: OutputFormat,
    pub workspace_folder: Option<&'a Path>,
    pub config_path: Option<&'a Path>,
    pub overrides: OptionOverrides,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowOutput {
    config_path: String,
    platform: String,
    execution_path: ExecutionPath,
    options: RunnerOptions,
    phases: BTreeMap<Phase, PhaseView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhaseView {
    /// Queue is emptied after its first successful run
    clear_after_run: bool,
    scripts: Vec<ScriptView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScriptView {
    command_line: String,
    command: String,
    args: Vec<String>,
}

/// Execute the show command
pub fn execute_show(args: ShowArgs<'_>) -> Result<()> {
    let loaded = load_config(ConfigLoadArgs {
        workspace_folder: args.workspace_folder,
        config_path: args.config_path,
        overrides: args.overrides,
    })?;

    let runner = ScriptRunner::with_options(&loaded.config, loaded.options);
    let phases = Phase::all()
        .iter()
        .filter_map(|phase| {
            let config = runner.state().config(*phase)?;
            let scripts = config
                .scripts
                .iter()
                .map(|script| {
                    let normalized = script.normalize();
                    ScriptView {
                        command_line: script.command_line(),
                        command: normalized.command,
                        args: normalized.args,
                    }
                })
                .collect();
            Some((
                *phase,
                PhaseView {
                    clear_after_run: config.repeat,
                    scripts,
                },
            ))
        })
        .collect();

    let output = ShowOutput {
        config_path: loaded.config_path.display().to_string(),
        platform: Platform::detect().to_string(),
        execution_path: runner.strategy().path(),
        options: *runner.options(),
        phases,
    };

    match args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        OutputFormat::Text => print_text(&output),
    }

    Ok(())
}

fn print_text(output: &ShowOutput) {
    println!("Configuration: {}", output.config_path);
    println!(
        "Platform: {} ({} execution)",
        output.platform, output.execution_path
    );
    println!(
        "Options: dev={} safe={} verbose={}",
        output.options.development_mode, output.options.safe_mode, output.options.verbose
    );

    for (phase, view) in &output.phases {
        let policy = if view.clear_after_run {
            "once per session"
        } else {
            "every run"
        };
        println!();
        println!("{} ({}):", phase, policy);
        for (index, script) in view.scripts.iter().enumerate() {
            println!("  {}. {}", index + 1, script.command_line);
        }
    }
}
