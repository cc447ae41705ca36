//! Ordered storage and tag-filtered lookup of declared hooks.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::definition::{
    Hook, HookArgs, HookFuture, HookPhase, HookScope, ScenarioHook, ScenarioHookBehavior,
    WorkerHook, WorkerHookBehavior,
};
use crate::error::DeclarationError;
use crate::fixtures::ResourceBag;
use crate::location::SourceLocation;
use crate::tags::TagExpression;

/// Hooks of one scope, kept in execution order.
///
/// Before hooks are appended, after hooks are inserted at the head, so a
/// single forward walk yields set-up in declaration order and teardown in
/// reverse declaration order.
pub struct HookList<B: ?Sized> {
    hooks: Vec<Hook<B>>,
}

impl<B: ?Sized> HookList<B> {
    fn push(&mut self, hook: Hook<B>) {
        match hook.phase() {
            HookPhase::Before => self.hooks.push(hook),
            HookPhase::After => self.hooks.insert(0, hook),
        }
    }

    /// Hooks of `phase` whose tag expression is absent or matches `tags`.
    #[must_use]
    pub fn query(&self, phase: HookPhase, tags: &[String]) -> Vec<&Hook<B>> {
        self.hooks
            .iter()
            .filter(|hook| hook.phase() == phase && hook.applies_to(tags))
            .collect()
    }

    /// Every hook in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Hook<B>> {
        self.hooks.iter()
    }

    /// Number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns whether no hook was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Union of the fixture names needed by every hook.
    #[must_use]
    pub fn fixture_names(&self) -> BTreeSet<String> {
        self.hooks.iter().flat_map(Hook::fixture_names).collect()
    }
}

impl<B: ?Sized> Default for HookList<B> {
    fn default() -> Self {
        Self { hooks: Vec::new() }
    }
}

/// Every hook declared for a test run.
///
/// Filled through `&mut self` while declarations load, then shared behind
/// an `Arc` and only queried. `W` is the world type scenario hooks act on.
///
/// # Examples
///
/// ```
/// use futures_util::FutureExt;
/// use hookwise::hooks::{HookPhase, HookRegistry};
///
/// struct World;
///
/// let mut registry = HookRegistry::<World>::new();
/// registry.before("@slow", |_world, _fixtures| async { Ok(()) }.boxed())?;
/// registry.after((), |_world, _fixtures| async { Ok(()) }.boxed())?;
///
/// let tags = vec![String::from("@slow")];
/// assert_eq!(registry.query(HookPhase::Before, &tags).len(), 1);
/// assert!(registry.query(HookPhase::Before, &[]).is_empty());
/// # Ok::<(), hookwise::error::DeclarationError>(())
/// ```
pub struct HookRegistry<W> {
    scenario: HookList<dyn ScenarioHookBehavior<W>>,
    worker: HookList<dyn WorkerHookBehavior>,
}

impl<W> HookRegistry<W> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scenario: HookList::default(),
            worker: HookList::default(),
        }
    }

    /// Declare a scenario hook.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] when the tag expression is malformed or an
    /// option value is unusable. Nothing is registered in that case.
    #[track_caller]
    pub fn register_scenario_hook(
        &mut self,
        phase: HookPhase,
        args: impl Into<HookArgs>,
        behavior: Arc<dyn ScenarioHookBehavior<W>>,
    ) -> Result<(), DeclarationError> {
        let hook = Hook::new(
            phase,
            HookScope::Scenario,
            args.into(),
            SourceLocation::caller(),
            behavior,
        )?;
        log_registration(&hook);
        self.scenario.push(hook);
        Ok(())
    }

    /// Declare a worker hook.
    ///
    /// # Errors
    ///
    /// As for [`Self::register_scenario_hook`].
    #[track_caller]
    pub fn register_worker_hook(
        &mut self,
        phase: HookPhase,
        args: impl Into<HookArgs>,
        behavior: Arc<dyn WorkerHookBehavior>,
    ) -> Result<(), DeclarationError> {
        let hook = Hook::new(
            phase,
            HookScope::Worker,
            args.into(),
            SourceLocation::caller(),
            behavior,
        )?;
        log_registration(&hook);
        self.worker.push(hook);
        Ok(())
    }

    /// Declare a scenario set-up hook.
    ///
    /// `args` is `()`, a tag expression, or [`super::HookOptions`].
    ///
    /// # Errors
    ///
    /// As for [`Self::register_scenario_hook`].
    #[track_caller]
    pub fn before<F>(
        &mut self,
        args: impl Into<HookArgs>,
        behavior: F,
    ) -> Result<(), DeclarationError>
    where
        F: Fn(Arc<W>, ResourceBag) -> HookFuture + Send + Sync + 'static,
        W: 'static,
    {
        self.register_scenario_hook(HookPhase::Before, args, Arc::new(behavior))
    }

    /// Declare a scenario teardown hook.
    ///
    /// # Errors
    ///
    /// As for [`Self::register_scenario_hook`].
    #[track_caller]
    pub fn after<F>(
        &mut self,
        args: impl Into<HookArgs>,
        behavior: F,
    ) -> Result<(), DeclarationError>
    where
        F: Fn(Arc<W>, ResourceBag) -> HookFuture + Send + Sync + 'static,
        W: 'static,
    {
        self.register_scenario_hook(HookPhase::After, args, Arc::new(behavior))
    }

    /// Declare a worker set-up hook.
    ///
    /// # Errors
    ///
    /// As for [`Self::register_scenario_hook`].
    #[track_caller]
    pub fn before_all<F>(
        &mut self,
        args: impl Into<HookArgs>,
        behavior: F,
    ) -> Result<(), DeclarationError>
    where
        F: Fn(ResourceBag) -> HookFuture + Send + Sync + 'static,
    {
        self.register_worker_hook(HookPhase::Before, args, Arc::new(behavior))
    }

    /// Declare a worker teardown hook.
    ///
    /// # Errors
    ///
    /// As for [`Self::register_scenario_hook`].
    #[track_caller]
    pub fn after_all<F>(
        &mut self,
        args: impl Into<HookArgs>,
        behavior: F,
    ) -> Result<(), DeclarationError>
    where
        F: Fn(ResourceBag) -> HookFuture + Send + Sync + 'static,
    {
        self.register_worker_hook(HookPhase::After, args, Arc::new(behavior))
    }

    /// Scenario hooks of `phase` selected by `tags`, in execution order.
    #[must_use]
    pub fn query(&self, phase: HookPhase, tags: &[String]) -> Vec<&ScenarioHook<W>> {
        self.scenario.query(phase, tags)
    }

    /// Worker hooks of `phase` selected by `tags`, in execution order.
    #[must_use]
    pub fn query_worker(&self, phase: HookPhase, tags: &[String]) -> Vec<&WorkerHook> {
        self.worker.query(phase, tags)
    }

    /// All scenario hooks.
    #[must_use]
    pub const fn scenario_hooks(&self) -> &HookList<dyn ScenarioHookBehavior<W>> {
        &self.scenario
    }

    /// All worker hooks.
    #[must_use]
    pub const fn worker_hooks(&self) -> &HookList<dyn WorkerHookBehavior> {
        &self.worker
    }

    /// Fixtures any scenario hook needs.
    #[must_use]
    pub fn scenario_fixture_names(&self) -> BTreeSet<String> {
        self.scenario.fixture_names()
    }

    /// Fixtures any worker hook needs.
    #[must_use]
    pub fn worker_fixture_names(&self) -> BTreeSet<String> {
        self.worker.fixture_names()
    }

    /// Number of hooks across both scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenario.len() + self.worker.len()
    }

    /// Returns whether no hook was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenario.is_empty() && self.worker.is_empty()
    }
}

impl<W> Default for HookRegistry<W> {
    fn default() -> Self {
        Self::new()
    }
}

fn log_registration<B: ?Sized>(hook: &Hook<B>) {
    debug!(
        phase = %hook.phase(),
        scope = %hook.scope(),
        name = hook.name().unwrap_or_default(),
        tags = hook.tag_expression().map(TagExpression::source).unwrap_or_default(),
        location = %hook.location(),
        "registered hook"
    );
}
