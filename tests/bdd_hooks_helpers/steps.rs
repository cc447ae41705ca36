//! Given/when steps for hook orchestration scenarios.

use std::sync::Arc;

use futures_util::FutureExt;
use hookwise::fixtures::{BDD_CONTEXT, BDD_WORLD, Resource, ResourceBag, ScenarioContext};
use hookwise::hooks::{
    HookFuture, HookOptions, HookPhase, HookPipeline, HookRegistry, PipelineSettings,
    ScenarioHookBehavior,
};
use rstest_bdd_macros::{given, when};

use super::StepResult;
use super::state::{HookAction, HookSpec, HookState, RunOutcome, World};

/// Append a declaration to the scenario state.
fn declare(hook_state: &HookState, hook_spec: HookSpec) -> StepResult<()> {
    let mut specs = hook_state
        .specs
        .get()
        .ok_or_else(|| String::from("hook specs should be initialised"))?;
    specs.push(hook_spec);
    hook_state.specs.set(specs);
    Ok(())
}

fn spec(phase: HookPhase, label: String, action: HookAction) -> HookSpec {
    HookSpec {
        phase,
        label,
        tags: None,
        timeout_ms: None,
        action,
    }
}

fn behavior_for(hook_spec: &HookSpec) -> Arc<dyn ScenarioHookBehavior<World>> {
    let label = hook_spec.label.clone();
    let action = hook_spec.action;
    Arc::new(move |world: Arc<World>, _fixtures: ResourceBag| -> HookFuture {
        world.record(label.as_str());
        match action {
            HookAction::Record => async { Ok(()) }.boxed(),
            HookAction::Fail => {
                let message = format!("hook {label} failed");
                async move { Err(eyre::eyre!(message)) }.boxed()
            }
            HookAction::Stall => std::future::pending().boxed(),
        }
    })
}

/// Build a registry from the collected declarations.
fn declare_hooks(hook_state: &HookState) -> StepResult<Option<HookRegistry<World>>> {
    let specs = hook_state
        .specs
        .get()
        .ok_or_else(|| String::from("hook specs should be initialised"))?;
    let mut registry = HookRegistry::new();
    for hook_spec in &specs {
        let mut options = HookOptions::new().name(hook_spec.label.as_str());
        if let Some(tags) = &hook_spec.tags {
            options = options.tags(tags.as_str());
        }
        if let Some(timeout_ms) = hook_spec.timeout_ms {
            options = options.timeout_ms(timeout_ms);
        }
        if let Err(error) =
            registry.register_scenario_hook(hook_spec.phase, options, behavior_for(hook_spec))
        {
            hook_state.declaration_error.set(error.to_string());
            return Ok(None);
        }
    }
    Ok(Some(registry))
}

#[given("a before hook {label} with no tags")]
fn given_before_hook(hook_state: &HookState, label: String) -> StepResult<()> {
    declare(hook_state, spec(HookPhase::Before, label, HookAction::Record))
}

#[given("an after hook {label} with no tags")]
fn given_after_hook(hook_state: &HookState, label: String) -> StepResult<()> {
    declare(hook_state, spec(HookPhase::After, label, HookAction::Record))
}

#[given("a before hook {label} tagged {tags}")]
fn given_tagged_before_hook(
    hook_state: &HookState,
    label: String,
    tags: String,
) -> StepResult<()> {
    let mut hook_spec = spec(HookPhase::Before, label, HookAction::Record);
    hook_spec.tags = Some(tags);
    declare(hook_state, hook_spec)
}

#[given("an after hook {label} tagged {tags}")]
fn given_tagged_after_hook(
    hook_state: &HookState,
    label: String,
    tags: String,
) -> StepResult<()> {
    let mut hook_spec = spec(HookPhase::After, label, HookAction::Record);
    hook_spec.tags = Some(tags);
    declare(hook_state, hook_spec)
}

#[given("a failing before hook {label}")]
fn given_failing_before_hook(hook_state: &HookState, label: String) -> StepResult<()> {
    declare(hook_state, spec(HookPhase::Before, label, HookAction::Fail))
}

#[given("a failing after hook {label}")]
fn given_failing_after_hook(hook_state: &HookState, label: String) -> StepResult<()> {
    declare(hook_state, spec(HookPhase::After, label, HookAction::Fail))
}

#[given("a stalling before hook {label} with a timeout of {timeout_ms} ms")]
fn given_stalling_before_hook(
    hook_state: &HookState,
    label: String,
    timeout_ms: u64,
) -> StepResult<()> {
    let mut hook_spec = spec(HookPhase::Before, label, HookAction::Stall);
    hook_spec.timeout_ms = Some(timeout_ms);
    declare(hook_state, hook_spec)
}

#[when("the hooks are declared")]
fn when_hooks_are_declared(hook_state: &HookState) -> StepResult<()> {
    declare_hooks(hook_state).map(|_| ())
}

#[when("a scenario tagged {tags} runs")]
#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes placeholder captures as owned values"
)]
fn when_scenario_runs(hook_state: &HookState, tags: String) -> StepResult<()> {
    let registry = declare_hooks(hook_state)?
        .ok_or_else(|| String::from("hooks should be declared without error"))?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|error| format!("failed to build runtime: {error}"))?;

    let world = Arc::new(World::default());
    let mut bag = ResourceBag::new().with(
        BDD_CONTEXT,
        ScenarioContext::new("tagged scenario", tags.split_whitespace()),
    );
    bag.insert_shared(BDD_WORLD, Arc::clone(&world) as Resource);

    let pipeline = HookPipeline::new(Arc::new(registry), PipelineSettings::default());
    let body_world = Arc::clone(&world);
    let run = runtime.block_on(pipeline.run_scenario(&bag, async move {
        body_world.record("body");
        Ok(())
    }));

    hook_state.events.set(world.events());
    let outcome = match run.into_result() {
        Ok(()) => RunOutcome::Passed,
        Err(error) => RunOutcome::Failed(error.to_string()),
    };
    hook_state.outcome.set(outcome);
    Ok(())
}
