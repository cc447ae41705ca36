//! Step definitions and their invocation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::{Instrument, info_span, warn};

use super::decorator::PomNode;
use crate::error::{ResolutionError, StepError};
use crate::fixtures::{DeclaresFixtures, FixtureParams, ResourceBag};
use crate::location::SourceLocation;
use crate::timeout::call_with_timeout;

/// Future returned by step bodies.
pub type StepFuture = BoxFuture<'static, eyre::Result<()>>;

/// Gherkin keyword a step is declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StepKeyword {
    /// Context.
    Given,
    /// Action.
    When,
    /// Outcome.
    Then,
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
        })
    }
}

/// Starts a step body once its arguments are known.
pub(crate) trait StepBehavior: Send + Sync {
    fn start(
        &self,
        pattern: &str,
        fixtures: &ResourceBag,
        args: Vec<String>,
    ) -> Result<StepFuture, ResolutionError>;
}

/// A step body that takes the whole bag.
struct PlainStep<F>(F);

impl<F> StepBehavior for PlainStep<F>
where
    F: Fn(ResourceBag, Vec<String>) -> StepFuture + Send + Sync,
{
    fn start(
        &self,
        _pattern: &str,
        fixtures: &ResourceBag,
        args: Vec<String>,
    ) -> Result<StepFuture, ResolutionError> {
        Ok((self.0)(fixtures.clone(), args))
    }
}

/// A registered step.
pub struct StepDefinition {
    keyword: StepKeyword,
    pattern: String,
    location: SourceLocation,
    pom_node: Option<PomNode>,
    fixtures: FixtureParams,
    timeout: Option<Duration>,
    behavior: Arc<dyn StepBehavior>,
}

impl StepDefinition {
    /// Define a step whose body receives the resource bag and the pattern
    /// captures.
    #[must_use]
    #[track_caller]
    pub fn new<F>(keyword: StepKeyword, pattern: impl Into<String>, body: F) -> Self
    where
        F: Fn(ResourceBag, Vec<String>) -> StepFuture + Send + Sync + 'static,
    {
        Self {
            keyword,
            pattern: pattern.into(),
            location: SourceLocation::caller(),
            pom_node: None,
            fixtures: FixtureParams::None,
            timeout: None,
            behavior: Arc::new(PlainStep(body)),
        }
    }

    pub(crate) fn bound_to_pom_node(
        keyword: StepKeyword,
        pattern: String,
        location: SourceLocation,
        pom_node: PomNode,
        behavior: Arc<dyn StepBehavior>,
    ) -> Self {
        Self {
            keyword,
            pattern,
            location,
            pom_node: Some(pom_node),
            fixtures: FixtureParams::Opaque,
            timeout: None,
            behavior,
        }
    }

    /// Declare the fixtures the body destructures.
    #[must_use]
    pub fn uses<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixtures = FixtureParams::destructured(names);
        self
    }

    /// Give the step its own timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The step keyword.
    #[must_use]
    pub const fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// The step pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Declaration site.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }

    /// The page-object node a decorator step is bound to.
    #[must_use]
    pub const fn pom_node(&self) -> Option<&PomNode> {
        self.pom_node.as_ref()
    }

    /// The step's own timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the step against `fixtures` with the pattern captures `args`.
    ///
    /// `default_timeout` applies when the step declares none.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::Resolution`] when a decorator step cannot find
    /// its receiver, [`StepError::Timeout`] when the body overruns, and
    /// [`StepError::Behavior`] with the body's own error otherwise.
    pub async fn invoke(
        &self,
        fixtures: &ResourceBag,
        args: Vec<String>,
        default_timeout: Option<Duration>,
    ) -> Result<(), StepError> {
        let span = info_span!(
            "step",
            keyword = %self.keyword,
            pattern = %self.pattern,
            location = %self.location,
        );
        let body = span
            .in_scope(|| self.behavior.start(&self.pattern, fixtures, args))
            .inspect_err(|error| span.in_scope(|| warn!(%error, "step dispatch failed")))?;
        match call_with_timeout(body, self.timeout.or(default_timeout))
            .instrument(span)
            .await
        {
            Ok(outcome) => outcome.map_err(StepError::Behavior),
            Err(timed_out) => Err(StepError::Timeout {
                pattern: self.pattern.clone(),
                timeout_ms: timed_out.millis(),
            }),
        }
    }
}

impl DeclaresFixtures for StepDefinition {
    fn fixture_params(&self) -> &FixtureParams {
        &self.fixtures
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("keyword", &self.keyword)
            .field("pattern", &self.pattern)
            .field("location", &self.location)
            .field("pom_node", &self.pom_node)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
