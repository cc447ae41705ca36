//! Sequential hook execution with per-phase failure policies.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, debug, error, info_span, warn};

use super::definition::{
    Hook, HookFuture, HookPhase, HookScope, ScenarioHookBehavior, WorkerHookBehavior,
};
use super::registry::HookRegistry;
use crate::config::AppConfig;
use crate::error::{HookError, ResolutionError};
use crate::fixtures::{BDD_WORLD, ResourceBag};
use crate::timeout::call_with_timeout;

/// Default timeouts applied to hooks that declare none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Default for scenario hooks.
    pub scenario_timeout: Option<Duration>,
    /// Default for worker hooks.
    pub worker_timeout: Option<Duration>,
}

impl PipelineSettings {
    /// Derive the defaults from loaded configuration.
    ///
    /// Worker hooks fall back to the scenario default when no worker
    /// specific timeout is configured.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let scenario_timeout = config.hook_timeout_ms.map(Duration::from_millis);
        Self {
            scenario_timeout,
            worker_timeout: config
                .worker
                .hook_timeout_ms
                .map(Duration::from_millis)
                .or(scenario_timeout),
        }
    }
}

/// Outcome of [`HookPipeline::run_scenario`].
#[derive(Debug)]
pub struct ScenarioRun {
    /// Result of the before phase.
    pub before: Result<(), HookError>,
    /// Result of the scenario body; `None` when a before hook failed.
    pub body: Option<eyre::Result<()>>,
    /// Result of the after phase. The after phase always runs.
    pub after: Result<(), HookError>,
}

impl ScenarioRun {
    /// Returns whether every part succeeded.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.before.is_ok() && matches!(self.body, Some(Ok(()))) && self.after.is_ok()
    }

    /// Collapse into the first failure: before, then body, then after.
    ///
    /// # Errors
    ///
    /// Returns the earliest failure of the run.
    ///
    /// A failing hook's own report is returned as is, so callers can
    /// downcast it to the error type the hook produced.
    pub fn into_result(self) -> eyre::Result<()> {
        self.before.map_err(into_report)?;
        if let Some(body) = self.body {
            body?;
        }
        self.after.map_err(into_report)?;
        Ok(())
    }
}

fn into_report(error: HookError) -> eyre::Report {
    match error {
        HookError::Behavior(report) => report,
        other => eyre::Report::new(other),
    }
}

/// Runs the hooks of a phase against a resource bag.
///
/// Hooks run one at a time in registry order. A before phase stops at the
/// first failure; an after phase runs every selected hook and reports the
/// first failure once all have finished.
pub struct HookPipeline<W> {
    registry: Arc<HookRegistry<W>>,
    settings: PipelineSettings,
}

impl<W> HookPipeline<W>
where
    W: Send + Sync + 'static,
{
    /// Create a pipeline over a fully populated registry.
    #[must_use]
    pub const fn new(registry: Arc<HookRegistry<W>>, settings: PipelineSettings) -> Self {
        Self { registry, settings }
    }

    /// The registry hooks are selected from.
    #[must_use]
    pub fn registry(&self) -> &HookRegistry<W> {
        &self.registry
    }

    /// Run the scenario hooks of `phase`.
    ///
    /// Tags come from the bag's scenario context; the world is read from
    /// [`BDD_WORLD`] and is only required when at least one hook is selected.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] per the phase failure policy, or
    /// [`ResolutionError::MissingResource`] when hooks are selected but the
    /// bag holds no world of type `W`.
    pub async fn run_phase(&self, phase: HookPhase, bag: &ResourceBag) -> Result<(), HookError> {
        let hooks = self.registry.query(phase, bag.tags());
        if hooks.is_empty() {
            debug!(%phase, "no scenario hooks selected");
            return Ok(());
        }
        let world = bag
            .get_shared::<W>(BDD_WORLD)
            .ok_or_else(|| ResolutionError::MissingResource {
                name: String::from(BDD_WORLD),
            })?;
        let context = bag.scenario_context().cloned().unwrap_or_default();
        let fixtures = bag.with_auto_inject(&context);
        run_hooks(
            phase,
            HookScope::Scenario,
            hooks,
            self.settings.scenario_timeout,
            |hook| ScenarioHookBehavior::call(hook.behavior(), Arc::clone(&world), fixtures.clone()),
        )
        .await
    }

    /// Run the worker hooks of `phase`.
    ///
    /// Worker hooks have no world and no scenario tags; only hooks without a
    /// tag expression, or whose expression accepts an empty tag set, run.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] per the phase failure policy.
    pub async fn run_worker_phase(
        &self,
        phase: HookPhase,
        bag: &ResourceBag,
    ) -> Result<(), HookError> {
        let hooks = self.registry.query_worker(phase, &[]);
        if hooks.is_empty() {
            debug!(%phase, "no worker hooks selected");
            return Ok(());
        }
        let context = bag.worker_context().cloned().unwrap_or_default();
        let fixtures = bag.with_worker_auto_inject(&context);
        run_hooks(
            phase,
            HookScope::Worker,
            hooks,
            self.settings.worker_timeout,
            |hook| WorkerHookBehavior::call(hook.behavior(), fixtures.clone()),
        )
        .await
    }

    /// Run before hooks, `body` and after hooks for one scenario.
    ///
    /// The body is skipped when a before hook fails; the after phase runs in
    /// every case.
    pub async fn run_scenario<F>(&self, bag: &ResourceBag, body: F) -> ScenarioRun
    where
        F: Future<Output = eyre::Result<()>>,
    {
        let before = self.run_phase(HookPhase::Before, bag).await;
        let outcome = match before {
            Ok(()) => Some(body.await),
            Err(_) => None,
        };
        let after = self.run_phase(HookPhase::After, bag).await;
        ScenarioRun {
            before,
            body: outcome,
            after,
        }
    }
}

async fn run_hooks<B, S>(
    phase: HookPhase,
    scope: HookScope,
    hooks: Vec<&Hook<B>>,
    default_timeout: Option<Duration>,
    mut start: S,
) -> Result<(), HookError>
where
    B: ?Sized,
    S: FnMut(&Hook<B>) -> HookFuture,
{
    let mut first_error = None;
    for hook in hooks {
        let span = info_span!(
            "hook",
            %phase,
            %scope,
            name = hook.name().unwrap_or_default(),
            location = %hook.location(),
        );
        let timeout = hook.timeout().or(default_timeout);
        let outcome = call_with_timeout(start(hook), timeout)
            .instrument(span.clone())
            .await;
        let failure = match outcome {
            Ok(Ok(())) => continue,
            Ok(Err(report)) => HookError::Behavior(report),
            Err(timed_out) => HookError::timeout(phase, hook.name(), timed_out.millis()),
        };
        if phase == HookPhase::Before {
            span.in_scope(|| error!(error = %failure, "before hook failed, skipping the rest"));
            return Err(failure);
        }
        span.in_scope(|| warn!(error = %failure, "after hook failed, continuing teardown"));
        first_error.get_or_insert(failure);
    }
    first_error.map_or(Ok(()), Err)
}
