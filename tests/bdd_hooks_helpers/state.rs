//! Scenario state for hook orchestration behavioural tests.

use std::sync::{Mutex, PoisonError};

use hookwise::hooks::HookPhase;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// What a declared hook does when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookAction {
    /// Record its label and succeed.
    Record,
    /// Record its label and fail.
    Fail,
    /// Record its label and never settle.
    Stall,
}

/// A hook declaration collected by the given steps.
#[derive(Debug, Clone)]
pub(crate) struct HookSpec {
    pub(crate) phase: HookPhase,
    pub(crate) label: String,
    pub(crate) tags: Option<String>,
    pub(crate) timeout_ms: Option<u64>,
    pub(crate) action: HookAction,
}

/// High-level outcome of a scenario run.
#[derive(Debug, Clone)]
pub(crate) enum RunOutcome {
    /// Every phase and the body succeeded.
    Passed,
    /// The run failed with the given message.
    Failed(String),
}

/// World the hooks record their labels into.
#[derive(Debug, Default)]
pub(crate) struct World {
    events: Mutex<Vec<String>>,
}

impl World {
    pub(crate) fn record(&self, event: impl Into<String>) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Default, ScenarioState)]
pub(crate) struct HookState {
    pub(crate) specs: Slot<Vec<HookSpec>>,
    pub(crate) declaration_error: Slot<String>,
    pub(crate) events: Slot<Vec<String>>,
    pub(crate) outcome: Slot<RunOutcome>,
}

#[fixture]
pub(crate) fn hook_state() -> HookState {
    let state = HookState::default();
    state.specs.set(Vec::new());
    state
}
