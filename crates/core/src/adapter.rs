//! Lifecycle adapter
//!
//! [`ScriptRunner`] is what a host build tool talks to. The host awaits
//! `before_build` and `after_emit` before continuing its own pipeline; an
//! error means the build must stop. `on_exit` is the terminal notification.

use crate::config::{RunnerConfig, RunnerOptions};
use crate::errors::Result;
use crate::exec::ExecutionStrategy;
use crate::phase::{HostHook, Phase};
use crate::platform::Platform;
use crate::runner::{run_phase, PhaseReport};
use crate::state::PhaseStateMachine;
use tracing::{debug, info, instrument};

/// Orchestrates the scripts bound to each build phase
#[derive(Debug)]
pub struct ScriptRunner {
    state: PhaseStateMachine,
    strategy: ExecutionStrategy,
    options: RunnerOptions,
}

impl ScriptRunner {
    /// Create a runner for the current platform
    pub fn new(config: &RunnerConfig) -> Self {
        Self::with_options(config, config.options())
    }

    /// Create a runner for the current platform with explicit options
    pub fn with_options(config: &RunnerConfig, options: RunnerOptions) -> Self {
        let strategy = ExecutionStrategy::new(Platform::detect(), options.safe_mode);
        Self::with_strategy(config, options, strategy)
    }

    /// Create a runner with explicit options and execution strategy
    pub fn with_strategy(
        config: &RunnerConfig,
        options: RunnerOptions,
        strategy: ExecutionStrategy,
    ) -> Self {
        debug!(
            "Creating script runner: dev={}, safe={}, path={}",
            options.development_mode,
            options.safe_mode,
            strategy.path()
        );
        Self {
            state: PhaseStateMachine::new(config.declarations(), options.development_mode),
            strategy,
            options,
        }
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    pub fn state(&self) -> &PhaseStateMachine {
        &self.state
    }

    pub fn strategy(&self) -> &ExecutionStrategy {
        &self.strategy
    }

    /// Host notification: compilation is about to start
    pub async fn before_build(&mut self) -> Result<Option<PhaseReport>> {
        self.run(Phase::BeforeBuild).await
    }

    /// Host notification: build output has been emitted
    pub async fn after_emit(&mut self) -> Result<Option<PhaseReport>> {
        self.run(Phase::AfterEmit).await
    }

    /// Host notification: the build run has finished
    pub async fn on_exit(&mut self) -> Result<Option<PhaseReport>> {
        self.run(Phase::OnExit).await
    }

    /// Dispatch a host hook to its phase
    pub async fn notify(&mut self, hook: HostHook) -> Result<Option<PhaseReport>> {
        self.run(hook.phase).await
    }

    /// Restore all phases to their declared scripts for a new watch session
    pub fn rearm(&mut self) {
        self.state.rearm();
    }

    /// Run the pending scripts of `phase`.
    ///
    /// Returns `None` without logging anything when the phase has nothing
    /// pending. The clear policy is applied only after every script succeeded.
    #[instrument(skip(self), fields(phase = %phase))]
    pub async fn run(&mut self, phase: Phase) -> Result<Option<PhaseReport>> {
        if self.state.is_empty(phase) {
            return Ok(None);
        }

        let scripts = self.state.scripts(phase);
        info!("{}", phase.banner());
        if self.options.verbose {
            for script in &scripts {
                info!("[{}] {}", phase, script);
            }
        }

        let report = run_phase(phase, &scripts, &self.strategy).await?;
        self.state.complete(phase);
        Ok(Some(report))
    }
}
