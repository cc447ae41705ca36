//! Assertion helpers for hook orchestration behavioural tests.

use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{HookState, RunOutcome};

#[then("the recorded events are {expected}")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes placeholder captures as owned values"
)]
fn recorded_events_are(hook_state: &HookState, expected: String) -> StepResult<()> {
    let events = hook_state
        .events
        .get()
        .ok_or_else(|| String::from("events should be recorded"))?;
    let expected_events: Vec<&str> = expected.split(", ").collect();
    if events == expected_events {
        Ok(())
    } else {
        Err(format!("expected events {expected_events:?}, got {events:?}"))
    }
}

#[then("the scenario passes")]
fn scenario_passes(hook_state: &HookState) -> StepResult<()> {
    match hook_state.outcome.get() {
        Some(RunOutcome::Passed) => Ok(()),
        Some(RunOutcome::Failed(message)) => Err(format!("expected success, got: {message}")),
        None => Err(String::from("scenario should have run")),
    }
}

#[then("the scenario fails with {message}")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes placeholder captures as owned values"
)]
fn scenario_fails_with(hook_state: &HookState, message: String) -> StepResult<()> {
    match hook_state.outcome.get() {
        Some(RunOutcome::Failed(actual)) if actual.contains(&message) => Ok(()),
        Some(RunOutcome::Failed(actual)) => {
            Err(format!("expected failure containing '{message}', got: {actual}"))
        }
        Some(RunOutcome::Passed) => Err(format!("expected failure '{message}', got success")),
        None => Err(String::from("scenario should have run")),
    }
}

#[then("the declaration is rejected mentioning {expression}")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes placeholder captures as owned values"
)]
fn declaration_is_rejected(hook_state: &HookState, expression: String) -> StepResult<()> {
    let error = hook_state
        .declaration_error
        .get()
        .ok_or_else(|| String::from("declaration should have failed"))?;
    if error.contains(&expression) {
        Ok(())
    } else {
        Err(format!("expected error mentioning '{expression}', got: {error}"))
    }
}
