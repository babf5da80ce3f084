//! Shared configuration loading helpers for CLI commands.
//!
//! Centralizes workspace/config resolution and option overrides so all
//! subcommands share the same error mapping.

use crate::cli::OptionOverrides;
use scriptrunner_core::config::{ConfigLoader, DiscoveryResult, RunnerConfig, RunnerOptions};
use scriptrunner_core::errors::{ConfigError, Result, RunnerError};
use std::path::{Path, PathBuf};

/// Inputs for configuration loading.
pub struct ConfigLoadArgs<'a> {
    /// Optional workspace folder (defaults to current directory)
    pub workspace_folder: Option<&'a Path>,
    /// Explicit config path (--config)
    pub config_path: Option<&'a Path>,
    /// Command-line option overrides
    pub overrides: OptionOverrides,
}

/// Loaded configuration and the options in effect.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: RunnerConfig,
    pub options: RunnerOptions,
    pub config_path: PathBuf,
}

/// Resolve and load configuration using shared discovery rules.
///
/// Resolution order:
/// - Use `config_path` when provided.
/// - Otherwise discover under `workspace_folder` (or current dir) via `ConfigLoader::discover_config`.
///
/// Command-line overrides are applied on top of the options read from the file.
pub fn load_config(args: ConfigLoadArgs<'_>) -> Result<ConfigLoadResult> {
    let workspace_folder = if let Some(folder) = args.workspace_folder {
        folder.to_path_buf()
    } else {
        std::env::current_dir().map_err(|e| RunnerError::Config(ConfigError::Io(e)))?
    };

    let config_path = if let Some(path) = args.config_path {
        path.to_path_buf()
    } else {
        match ConfigLoader::discover_config(&workspace_folder) {
            DiscoveryResult::Single(path) => path,
            DiscoveryResult::Multiple(paths) => {
                let display_paths: Vec<String> = paths
                    .iter()
                    .map(|p| {
                        p.strip_prefix(&workspace_folder)
                            .unwrap_or(p)
                            .to_string_lossy()
                            .to_string()
                    })
                    .collect();
                return Err(RunnerError::Config(ConfigError::MultipleConfigs {
                    paths: display_paths,
                }));
            }
            DiscoveryResult::None(default) => default,
        }
    };

    let config = ConfigLoader::load_from_path(&config_path)?;
    let options = apply_overrides(config.options(), args.overrides);

    Ok(ConfigLoadResult {
        config,
        options,
        config_path,
    })
}

fn apply_overrides(mut options: RunnerOptions, overrides: OptionOverrides) -> RunnerOptions {
    if let Some(dev) = overrides.development_mode {
        options.development_mode = dev;
    }
    options.safe_mode |= overrides.safe_mode;
    options.verbose |= overrides.verbose;
    options
}
