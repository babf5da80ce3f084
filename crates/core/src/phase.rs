//! Build lifecycle phases
//!
//! The fixed set of points in a build at which scripts may run, and the
//! mapping from host hook names onto them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phases of a build, in notification order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Before compilation starts
    BeforeBuild,
    /// After build output has been emitted
    AfterEmit,
    /// After the build run has fully finished
    OnExit,
}

impl Phase {
    /// Get the phase name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeBuild => "before-build",
            Phase::AfterEmit => "after-emit",
            Phase::OnExit => "on-exit",
        }
    }

    /// All phases in the order a host notifies them
    pub fn all() -> &'static [Phase] {
        &[Phase::BeforeBuild, Phase::AfterEmit, Phase::OnExit]
    }

    /// Whether this is the terminal notification of a build run.
    ///
    /// The host does not wait on the terminal phase and its scripts are never
    /// cleared, since the process ends afterwards.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::OnExit)
    }

    /// Announcement logged before the phase's scripts run
    pub fn banner(&self) -> &'static str {
        match self {
            Phase::BeforeBuild => "Executing pre-build scripts",
            Phase::AfterEmit => "Executing post-build scripts",
            Phase::OnExit => "Executing additional scripts before exit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before-build" => Ok(Phase::BeforeBuild),
            "after-emit" => Ok(Phase::AfterEmit),
            "on-exit" => Ok(Phase::OnExit),
            other => Err(format!(
                "unknown phase '{}', expected one of: before-build, after-emit, on-exit",
                other
            )),
        }
    }
}

/// Registration style exposed by a host build tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStyle {
    /// Named hook objects (`beforeCompile`, `afterEmit`, `done`)
    Tapped,
    /// Plain event names (`compilation`, `after-emit`, `done`)
    Legacy,
}

/// A host notification bound to a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostHook {
    pub phase: Phase,
    pub style: HookStyle,
}

impl HostHook {
    /// Event name the host uses for `phase` under the given registration style.
    ///
    /// Both styles use `done` for the terminal phase.
    pub fn event_name(phase: Phase, style: HookStyle) -> &'static str {
        match (style, phase) {
            (HookStyle::Tapped, Phase::BeforeBuild) => "beforeCompile",
            (HookStyle::Tapped, Phase::AfterEmit) => "afterEmit",
            (HookStyle::Legacy, Phase::BeforeBuild) => "compilation",
            (HookStyle::Legacy, Phase::AfterEmit) => "after-emit",
            (_, Phase::OnExit) => "done",
        }
    }

    /// Resolve a host event name, accepting both registration styles.
    ///
    /// Hosts lacking tapped hooks still deliver the legacy names, so an
    /// unrecognised style never becomes a runtime error. `done` is shared by
    /// both styles and resolves as [`HookStyle::Tapped`].
    pub fn from_event_name(name: &str) -> Option<Self> {
        let (phase, style) = match name {
            "beforeCompile" => (Phase::BeforeBuild, HookStyle::Tapped),
            "afterEmit" => (Phase::AfterEmit, HookStyle::Tapped),
            "compilation" => (Phase::BeforeBuild, HookStyle::Legacy),
            "after-emit" => (Phase::AfterEmit, HookStyle::Legacy),
            "done" => (Phase::OnExit, HookStyle::Tapped),
            _ => return None,
        };
        Some(Self { phase, style })
    }
}
