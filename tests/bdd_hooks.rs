//! Behavioural tests for scenario hook orchestration.

mod bdd_hooks_helpers;

use bdd_hooks_helpers::{HookState, hook_state};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/hooks.feature",
    name = "Tagged hooks run only for matching scenarios"
)]
fn tagged_hooks_run_only_for_matching_scenarios(hook_state: HookState) {
    let _ = hook_state;
}

#[scenario(
    path = "tests/features/hooks.feature",
    name = "Tag expressions combine several tags"
)]
fn tag_expressions_combine_several_tags(hook_state: HookState) {
    let _ = hook_state;
}

#[scenario(
    path = "tests/features/hooks.feature",
    name = "Before hooks run in declaration order"
)]
fn before_hooks_run_in_declaration_order(hook_state: HookState) {
    let _ = hook_state;
}

#[scenario(
    path = "tests/features/hooks.feature",
    name = "After hooks run in reverse declaration order"
)]
fn after_hooks_run_in_reverse_declaration_order(hook_state: HookState) {
    let _ = hook_state;
}

#[scenario(
    path = "tests/features/hooks.feature",
    name = "A failing before hook stops set-up and skips the body"
)]
fn failing_before_hook_stops_set_up(hook_state: HookState) {
    let _ = hook_state;
}

#[scenario(
    path = "tests/features/hooks.feature",
    name = "Every after hook runs and the first failure is reported"
)]
fn every_after_hook_runs(hook_state: HookState) {
    let _ = hook_state;
}

#[scenario(
    path = "tests/features/hooks.feature",
    name = "A stalled hook is abandoned after its timeout"
)]
fn stalled_hook_is_abandoned(hook_state: HookState) {
    let _ = hook_state;
}

#[scenario(
    path = "tests/features/hooks.feature",
    name = "A malformed tag expression is rejected at declaration"
)]
fn malformed_tag_expression_is_rejected(hook_state: HookState) {
    let _ = hook_state;
}
