//! Core library for scriptrunner
//!
//! Binds user-declared scripts to build lifecycle phases (`before-build`,
//! `after-emit`, `on-exit`) and runs them with a platform-appropriate
//! process-spawning strategy. In development (watch) mode the pre- and
//! post-build scripts fire once per session.

pub mod adapter;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod phase;
pub mod platform;
pub mod runner;
pub mod script;
pub mod state;

pub use adapter::ScriptRunner;
pub use config::{ConfigLoader, RunnerConfig, RunnerOptions};
pub use phase::Phase;
pub use script::{NormalizedScript, ScriptDeclaration};

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
