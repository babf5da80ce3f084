//! Configuration loading
//!
//! Reads the script runner configuration from JSON-with-comments (parsed with
//! json5) or TOML, and resolves it into per-phase script declarations plus
//! [`RunnerOptions`].
//!
//! Recognised keys (camelCase): `onBuildStart`, `onBuildEnd`, `onBuildExit`,
//! `dev`, `verbose`, `safe`. Unknown keys are ignored and logged at DEBUG.

use crate::errors::{ConfigError, Result, RunnerError};
use crate::phase::Phase;
use crate::script::{split_command_chain, ScriptDeclaration};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// File names searched for in a workspace, in precedence order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "scriptrunner.json",
    "scriptrunner.jsonc",
    ".scriptrunner.json",
    "scriptrunner.toml",
];

const KNOWN_KEYS: &[&str] = &[
    "onBuildStart",
    "onBuildEnd",
    "onBuildExit",
    "dev",
    "verbose",
    "safe",
];

/// Process-wide runner options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerOptions {
    /// Repeating development build: before-build/after-emit fire once per session
    pub development_mode: bool,
    /// Force shell-mediated execution on every platform
    pub safe_mode: bool,
    /// Log each script as it starts
    pub verbose: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            development_mode: true,
            safe_mode: false,
            verbose: false,
        }
    }
}

/// Scripts declared for one phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptSource {
    /// `&&`-separated command chain, one script per segment
    Chain(String),
    /// Explicit list of declarations
    List(Vec<ScriptDeclaration>),
}

impl Default for ScriptSource {
    fn default() -> Self {
        ScriptSource::List(Vec::new())
    }
}

impl ScriptSource {
    /// Expand into individual declarations in order
    pub fn into_scripts(self) -> Vec<ScriptDeclaration> {
        match self {
            ScriptSource::Chain(chain) => split_command_chain(&chain),
            ScriptSource::List(scripts) => scripts,
        }
    }
}

/// Script runner configuration as written by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
    #[serde(default)]
    pub on_build_start: ScriptSource,
    #[serde(default)]
    pub on_build_end: ScriptSource,
    #[serde(default)]
    pub on_build_exit: ScriptSource,
    #[serde(default)]
    pub dev: Option<bool>,
    #[serde(default)]
    pub verbose: Option<bool>,
    #[serde(default)]
    pub safe: Option<bool>,
}

impl RunnerConfig {
    /// Scripts declared for `phase`
    pub fn scripts(&self, phase: Phase) -> Vec<ScriptDeclaration> {
        let source = match phase {
            Phase::BeforeBuild => &self.on_build_start,
            Phase::AfterEmit => &self.on_build_end,
            Phase::OnExit => &self.on_build_exit,
        };
        source.clone().into_scripts()
    }

    /// Declarations for every phase, in notification order
    pub fn declarations(&self) -> Vec<(Phase, Vec<ScriptDeclaration>)> {
        Phase::all().iter().map(|p| (*p, self.scripts(*p))).collect()
    }

    /// Options with documented defaults applied for missing keys
    pub fn options(&self) -> RunnerOptions {
        let defaults = RunnerOptions::default();
        RunnerOptions {
            development_mode: self.dev.unwrap_or(defaults.development_mode),
            safe_mode: self.safe.unwrap_or(defaults.safe_mode),
            verbose: self.verbose.unwrap_or(defaults.verbose),
        }
    }
}

/// Outcome of searching a workspace for configuration files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryResult {
    Single(PathBuf),
    Multiple(Vec<PathBuf>),
    /// Nothing found; carries the default location
    None(PathBuf),
}

/// Configuration discovery and loading
pub struct ConfigLoader;

impl ConfigLoader {
    /// Find configuration files in `workspace`
    #[instrument(skip_all, fields(workspace = %workspace.display()))]
    pub fn discover_config(workspace: &Path) -> DiscoveryResult {
        let found: Vec<PathBuf> = CONFIG_FILE_NAMES
            .iter()
            .map(|name| workspace.join(name))
            .filter(|path| path.is_file())
            .collect();

        match found.len() {
            0 => {
                debug!("No configuration file found");
                DiscoveryResult::None(workspace.join(CONFIG_FILE_NAMES[0]))
            }
            1 => DiscoveryResult::Single(found.into_iter().next().unwrap_or_default()),
            n => {
                debug!("Found {} configuration files", n);
                DiscoveryResult::Multiple(found)
            }
        }
    }

    /// Load configuration from a file, choosing the parser by extension
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_from_path(path: &Path) -> Result<RunnerConfig> {
        debug!("Loading configuration from {}", path.display());

        if !path.exists() {
            return Err(RunnerError::Config(ConfigError::NotFound {
                path: path.display().to_string(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            debug!("Failed to read configuration file: {}", e);
            RunnerError::Config(ConfigError::Io(e))
        })?;

        let is_toml = path.extension().and_then(|e| e.to_str()) == Some("toml");
        if is_toml {
            Self::load_from_toml_str(&content)
        } else {
            Self::load_from_str(&content)
        }
    }

    /// Parse JSON-with-comments configuration text
    pub fn load_from_str(content: &str) -> Result<RunnerConfig> {
        let raw_value: serde_json::Value = json5::from_str(content).map_err(|e| {
            RunnerError::Config(ConfigError::Parsing {
                message: format!("JSON parsing error: {}", e),
            })
        })?;
        Self::from_value(raw_value)
    }

    /// Parse TOML configuration text
    pub fn load_from_toml_str(content: &str) -> Result<RunnerConfig> {
        let raw_value: serde_json::Value = toml::from_str(content).map_err(|e| {
            RunnerError::Config(ConfigError::Parsing {
                message: format!("TOML parsing error: {}", e),
            })
        })?;
        Self::from_value(raw_value)
    }

    fn from_value(raw_value: serde_json::Value) -> Result<RunnerConfig> {
        let serde_json::Value::Object(obj) = &raw_value else {
            return Err(RunnerError::Config(ConfigError::Validation {
                message: "Configuration must contain an object at the top level".to_string(),
            }));
        };

        for key in obj.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            debug!("Ignoring unknown configuration key: {}", key);
        }

        serde_json::from_value(raw_value).map_err(|e| {
            RunnerError::Config(ConfigError::Validation {
                message: format!("Deserialization error: {}", e),
            })
        })
    }
}
