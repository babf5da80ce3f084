//! Per-phase script queues
//!
//! Tracks which scripts are still pending for each phase and applies the
//! clear-or-retain policy after a successful run:
//!
//! - `before-build` and `after-emit` are cleared in development mode, so in a
//!   watch session they fire on the first iteration only.
//! - `on-exit` is never cleared.
//! - A failed run changes nothing.
//!
//! This type is the only mutator of phase state.

use crate::phase::Phase;
use crate::script::ScriptDeclaration;
use indexmap::IndexMap;
use tracing::debug;

/// Script queue of a single phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseConfig {
    /// Pending scripts in declaration order
    pub scripts: Vec<ScriptDeclaration>,
    /// Repeating (watch) build: clear the queue once it has run
    pub repeat: bool,
}

impl PhaseConfig {
    fn new(phase: Phase, scripts: Vec<ScriptDeclaration>, development_mode: bool) -> Self {
        Self {
            scripts,
            repeat: development_mode && !phase.is_terminal(),
        }
    }
}

/// Script queues for all phases
#[derive(Debug, Clone)]
pub struct PhaseStateMachine {
    declared: IndexMap<Phase, Vec<ScriptDeclaration>>,
    phases: IndexMap<Phase, PhaseConfig>,
    development_mode: bool,
}

impl PhaseStateMachine {
    /// Build the queues from per-phase declarations.
    ///
    /// Phases without a declaration start empty.
    pub fn new<I>(declarations: I, development_mode: bool) -> Self
    where
        I: IntoIterator<Item = (Phase, Vec<ScriptDeclaration>)>,
    {
        let mut declared: IndexMap<Phase, Vec<ScriptDeclaration>> =
            Phase::all().iter().map(|p| (*p, Vec::new())).collect();
        for (phase, scripts) in declarations {
            declared.insert(phase, scripts);
        }

        let mut machine = Self {
            declared,
            phases: IndexMap::new(),
            development_mode,
        };
        machine.rearm();
        machine
    }

    /// Copy of the scripts currently pending for `phase`
    pub fn scripts(&self, phase: Phase) -> Vec<ScriptDeclaration> {
        self.phases
            .get(&phase)
            .map(|c| c.scripts.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self, phase: Phase) -> bool {
        self.phases
            .get(&phase)
            .map_or(true, |c| c.scripts.is_empty())
    }

    pub fn config(&self, phase: Phase) -> Option<&PhaseConfig> {
        self.phases.get(&phase)
    }

    /// Apply the post-run policy after `phase` ran successfully.
    ///
    /// Returns whether the queue was cleared.
    pub fn complete(&mut self, phase: Phase) -> bool {
        match self.phases.get_mut(&phase) {
            Some(config) if config.repeat && !config.scripts.is_empty() => {
                debug!("Clearing {} scripts after first run", phase);
                config.scripts.clear();
                true
            }
            _ => false,
        }
    }

    /// Restore every phase to its declared scripts
    pub fn rearm(&mut self) {
        self.phases = self
            .declared
            .iter()
            .map(|(phase, scripts)| {
                (
                    *phase,
                    PhaseConfig::new(*phase, scripts.clone(), self.development_mode),
                )
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(development_mode: bool) -> PhaseStateMachine {
        let scripts = |names: &[&str]| -> Vec<ScriptDeclaration> {
            names.iter().map(|n| ScriptDeclaration::from(*n)).collect()
        };
        PhaseStateMachine::new(
            [
                (Phase::BeforeBuild, scripts(&["clean", "lint"])),
                (Phase::AfterEmit, scripts(&["copy"])),
                (Phase::OnExit, scripts(&["notify"])),
            ],
            development_mode,
        )
    }

    #[test]
    fn test_scripts_preserve_declaration_order() {
        let state = machine(false);
        assert_eq!(
            state.scripts(Phase::BeforeBuild),
            vec![
                ScriptDeclaration::from("clean"),
                ScriptDeclaration::from("lint")
            ]
        );
    }

    #[test]
    fn test_missing_declarations_start_empty() {
        let state =
            PhaseStateMachine::new([(Phase::AfterEmit, vec![ScriptDeclaration::from("x")])], true);
        assert!(state.is_empty(Phase::BeforeBuild));
        assert!(!state.is_empty(Phase::AfterEmit));
        assert!(state.is_empty(Phase::OnExit));
        assert!(state.config(Phase::OnExit).is_some());
    }

    #[test]
    fn test_production_mode_retains_scripts() {
        let mut state = machine(false);
        for phase in Phase::all() {
            assert!(!state.complete(*phase));
            assert!(!state.is_empty(*phase));
        }
    }

    #[test]
    fn test_development_mode_clears_non_terminal_phases() {
        let mut state = machine(true);

        assert!(state.complete(Phase::BeforeBuild));
        assert!(state.is_empty(Phase::BeforeBuild));
        assert!(state.scripts(Phase::BeforeBuild).is_empty());

        assert!(state.complete(Phase::AfterEmit));
        assert!(state.is_empty(Phase::AfterEmit));

        assert!(!state.complete(Phase::OnExit));
        assert_eq!(state.scripts(Phase::OnExit).len(), 1);
    }

    #[test]
    fn test_repeat_flag_follows_mode_and_phase() {
        let state = machine(true);
        assert!(state.config(Phase::BeforeBuild).unwrap().repeat);
        assert!(state.config(Phase::AfterEmit).unwrap().repeat);
        assert!(!state.config(Phase::OnExit).unwrap().repeat);

        let state = machine(false);
        assert!(Phase::all()
            .iter()
            .all(|p| !state.config(*p).unwrap().repeat));
    }

    #[test]
    fn test_rearm_restores_declared_scripts() {
        let mut state = machine(true);
        state.complete(Phase::BeforeBuild);
        state.complete(Phase::AfterEmit);

        state.rearm();
        assert_eq!(state.scripts(Phase::BeforeBuild).len(), 2);
        assert_eq!(state.scripts(Phase::AfterEmit).len(), 1);
    }
}
