//! Phase execution
//!
//! Runs the scripts of one lifecycle phase strictly in declaration order,
//! waiting for each child to exit before starting the next. The first failure
//! aborts the rest of the phase.

use crate::errors::{Result, RunnerError};
use crate::exec::{ExecutionPath, ExecutionStrategy};
use crate::phase::Phase;
use crate::script::ScriptDeclaration;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};

/// Record of one successfully executed script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutcome {
    /// The script's command line
    pub script: String,
    pub path: ExecutionPath,
    pub duration: Duration,
}

/// Result of a fully successful phase run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub scripts: Vec<ScriptOutcome>,
}

impl PhaseReport {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            scripts: Vec::new(),
        }
    }

    /// Number of scripts that ran
    pub fn executed(&self) -> usize {
        self.scripts.len()
    }

    /// Total wall-clock time across all scripts
    pub fn total_duration(&self) -> Duration {
        self.scripts.iter().map(|s| s.duration).sum()
    }
}

/// Execute `scripts` for `phase` sequentially.
///
/// An empty list is a no-op. On failure the returned error names the phase,
/// the 1-based position and the script text; later scripts are not started.
#[instrument(skip(scripts, strategy), fields(phase = %phase, path = %strategy.path()))]
pub async fn run_phase(
    phase: Phase,
    scripts: &[ScriptDeclaration],
    strategy: &ExecutionStrategy,
) -> Result<PhaseReport> {
    let mut report = PhaseReport::new(phase);

    for (i, script) in scripts.iter().enumerate() {
        debug!(
            "Executing script {} of {} for phase {}: {}",
            i + 1,
            scripts.len(),
            phase,
            script
        );

        let start_time = Instant::now();
        if let Err(source) = strategy.execute(script).await {
            error!("Script {} failed in phase {}: {}", i + 1, phase, source);
            return Err(RunnerError::Phase {
                phase,
                index: i + 1,
                script: script.command_line(),
                source,
            });
        }

        let duration = start_time.elapsed();
        debug!("Script completed in {:?}", duration);
        report.scripts.push(ScriptOutcome {
            script: script.command_line(),
            path: strategy.path(),
            duration,
        });
    }

    if !scripts.is_empty() {
        info!(
            "Completed phase {} ({} scripts in {:?})",
            phase,
            report.executed(),
            report.total_duration()
        );
    }
    Ok(report)
}
