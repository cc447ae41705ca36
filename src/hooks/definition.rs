//! Hook declarations: phase, scope, options and behaviour.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::error::DeclarationError;
use crate::fixtures::{
    DeclaresFixtures, FixtureParams, ResourceBag, is_worker_auto_inject_fixture, names_needed_by,
};
use crate::location::SourceLocation;
use crate::tags::TagExpression;

/// Future returned by hook behaviours.
pub type HookFuture = BoxFuture<'static, eyre::Result<()>>;

/// When a hook runs relative to the scenario or worker it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPhase {
    /// Set-up, run in declaration order.
    Before,
    /// Teardown, run in reverse declaration order.
    After,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "before",
            Self::After => "after",
        })
    }
}

/// How often a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookScope {
    /// Once per scenario.
    Scenario,
    /// Once per test-execution worker.
    Worker,
}

impl fmt::Display for HookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scenario => "scenario",
            Self::Worker => "worker",
        })
    }
}

/// Behaviour of a scenario hook.
///
/// The world is the object the hook acts on; `fixtures` is the effective
/// argument bag. Closures with the matching signature implement this trait.
pub trait ScenarioHookBehavior<W>: Send + Sync {
    /// Start the hook.
    fn call(&self, world: Arc<W>, fixtures: ResourceBag) -> HookFuture;
}

impl<W, F> ScenarioHookBehavior<W> for F
where
    F: Fn(Arc<W>, ResourceBag) -> HookFuture + Send + Sync,
{
    fn call(&self, world: Arc<W>, fixtures: ResourceBag) -> HookFuture {
        self(world, fixtures)
    }
}

/// Behaviour of a worker hook. Worker hooks have no world.
pub trait WorkerHookBehavior: Send + Sync {
    /// Start the hook.
    fn call(&self, fixtures: ResourceBag) -> HookFuture;
}

impl<F> WorkerHookBehavior for F
where
    F: Fn(ResourceBag) -> HookFuture + Send + Sync,
{
    fn call(&self, fixtures: ResourceBag) -> HookFuture {
        self(fixtures)
    }
}

/// Structured hook options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookOptions {
    /// Name shown in diagnostics.
    pub name: Option<String>,
    /// Tag expression gating the hook; absent means "always".
    pub tags: Option<String>,
    /// Timeout in milliseconds; absent falls back to the configured default.
    pub timeout_ms: Option<u64>,
    /// Fixtures the behaviour destructures.
    pub fixtures: FixtureParams,
}

impl HookOptions {
    /// Options with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diagnostic name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the tag expression.
    #[must_use]
    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Set the timeout.
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Declare the fixtures the behaviour destructures.
    #[must_use]
    pub fn uses<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixtures = FixtureParams::destructured(names);
        self
    }

    fn validate(&self) -> Result<(), DeclarationError> {
        if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(DeclarationError::InvalidOption {
                option: String::from("name"),
                reason: String::from("must not be blank"),
            });
        }
        if self.timeout_ms == Some(0) {
            return Err(DeclarationError::InvalidOption {
                option: String::from("timeout_ms"),
                reason: String::from("must be greater than zero"),
            });
        }
        Ok(())
    }

    fn compile_tags(&self) -> Result<Option<TagExpression>, DeclarationError> {
        self.tags
            .as_deref()
            .filter(|tags| !tags.is_empty())
            .map(TagExpression::parse)
            .transpose()
    }
}

/// The argument shapes accepted before a hook behaviour.
///
/// A hook is declared with its behaviour alone, with a tag expression, or
/// with structured options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HookArgs {
    /// Behaviour only.
    #[default]
    None,
    /// A tag expression.
    Tags(String),
    /// Structured options.
    Options(HookOptions),
}

impl HookArgs {
    /// Normalise the shape into options.
    #[must_use]
    pub fn into_options(self) -> HookOptions {
        match self {
            Self::None => HookOptions::default(),
            Self::Tags(tags) => HookOptions::default().tags(tags),
            Self::Options(options) => options,
        }
    }
}

impl From<()> for HookArgs {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<&str> for HookArgs {
    fn from(tags: &str) -> Self {
        Self::Tags(String::from(tags))
    }
}

impl From<String> for HookArgs {
    fn from(tags: String) -> Self {
        Self::Tags(tags)
    }
}

impl From<HookOptions> for HookArgs {
    fn from(options: HookOptions) -> Self {
        Self::Options(options)
    }
}

/// A declared hook.
///
/// Built once at registration; the tag expression is compiled then so a
/// malformed expression fails at declaration time.
pub struct Hook<B: ?Sized> {
    phase: HookPhase,
    scope: HookScope,
    options: HookOptions,
    tag_expression: Option<TagExpression>,
    location: SourceLocation,
    behavior: Arc<B>,
}

impl<B: ?Sized> Hook<B> {
    /// Validate the declaration and compile its tag expression.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError`] for a malformed tag expression, a blank
    /// name or a zero timeout.
    pub fn new(
        phase: HookPhase,
        scope: HookScope,
        args: HookArgs,
        location: SourceLocation,
        behavior: Arc<B>,
    ) -> Result<Self, DeclarationError> {
        let options = args.into_options();
        options.validate()?;
        let tag_expression = options.compile_tags()?;
        Ok(Self {
            phase,
            scope,
            options,
            tag_expression,
            location,
            behavior,
        })
    }

    /// The hook phase.
    #[must_use]
    pub const fn phase(&self) -> HookPhase {
        self.phase
    }

    /// The hook scope.
    #[must_use]
    pub const fn scope(&self) -> HookScope {
        self.scope
    }

    /// Diagnostic name, when declared.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.options.name.as_deref()
    }

    /// The compiled tag expression, when declared.
    #[must_use]
    pub const fn tag_expression(&self) -> Option<&TagExpression> {
        self.tag_expression.as_ref()
    }

    /// Declared timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.options.timeout_ms.map(Duration::from_millis)
    }

    /// Declaration site.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }

    /// The behaviour to invoke.
    #[must_use]
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// Returns whether the hook applies to a scenario with `tags`.
    #[must_use]
    pub fn applies_to(&self, tags: &[String]) -> bool {
        self.tag_expression
            .as_ref()
            .is_none_or(|expression| expression.evaluate(tags))
    }

    /// Fixtures the hook needs, auto-injected names excluded.
    #[must_use]
    pub fn fixture_names(&self) -> std::collections::BTreeSet<String> {
        let mut names = names_needed_by(self);
        if self.scope == HookScope::Worker {
            names.retain(|name| !is_worker_auto_inject_fixture(name));
        }
        names
    }
}

impl<B: ?Sized> DeclaresFixtures for Hook<B> {
    fn fixture_params(&self) -> &FixtureParams {
        &self.options.fixtures
    }
}

impl<B: ?Sized> fmt::Debug for Hook<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("phase", &self.phase)
            .field("scope", &self.scope)
            .field("options", &self.options)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// A scenario hook acting on world `W`.
pub type ScenarioHook<W> = Hook<dyn ScenarioHookBehavior<W>>;

/// A worker hook.
pub type WorkerHook = Hook<dyn WorkerHookBehavior>;
