//! Steps declared as methods of page-object types.
//!
//! A page object's methods are declared into a [`DecoratedSteps`] side table
//! keyed by the owning type and method name. Once the fixture that
//! materialises the page object is known, [`DecoratedSteps::link_with_pom_node`]
//! registers each of the type's methods as a step bound to that fixture.
//!
//! When such a step fires, its receiver is the single entry of the bag that
//! is not auto-injected.

use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::definition::{StepBehavior, StepDefinition, StepFuture, StepKeyword};
use super::registry::StepRegistry;
use crate::error::ResolutionError;
use crate::fixtures::{Resource, ResourceBag, is_auto_inject_fixture};
use crate::location::SourceLocation;

/// Identity of a method on a page-object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodKey {
    owner: TypeId,
    method: &'static str,
}

impl MethodKey {
    /// Key of `method` on `P`.
    #[must_use]
    pub fn of<P: Any>(method: &'static str) -> Self {
        Self {
            owner: TypeId::of::<P>(),
            method,
        }
    }

    /// The method name.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }
}

/// The fixture a page-object type is materialised by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomNode {
    /// Name of the fixture in the resource bag.
    pub fixture_name: String,
    /// Name of the page-object type.
    pub type_name: &'static str,
}

impl PomNode {
    /// Node for page-object type `P` provided by `fixture_name`.
    #[must_use]
    pub fn of<P: Any>(fixture_name: impl Into<String>) -> Self {
        Self {
            fixture_name: fixture_name.into(),
            type_name: type_name::<P>(),
        }
    }
}

/// Find the one bag entry that is not auto-injected.
///
/// # Errors
///
/// Returns [`ResolutionError::NoSuitableFixture`] when every entry is
/// auto-injected and [`ResolutionError::SeveralSuitableFixtures`] when more
/// than one entry qualifies.
pub fn first_non_auto_inject_fixture<'bag>(
    fixtures: &'bag ResourceBag,
    pattern: &str,
) -> Result<(&'bag str, &'bag Resource), ResolutionError> {
    let mut candidates = fixtures
        .iter()
        .filter(|(name, _)| !is_auto_inject_fixture(name));
    let Some(first) = candidates.next() else {
        return Err(ResolutionError::NoSuitableFixture {
            pattern: String::from(pattern),
        });
    };
    if candidates.next().is_some() {
        let names: Vec<&str> = fixtures
            .names()
            .filter(|name| !is_auto_inject_fixture(name))
            .collect();
        return Err(ResolutionError::SeveralSuitableFixtures {
            pattern: String::from(pattern),
            candidates: names.join(", "),
        });
    }
    Ok(first)
}

type Method<P> = dyn Fn(Arc<P>, Vec<String>) -> StepFuture + Send + Sync;

/// Calls a page-object method on the receiver found in the bag.
struct ReceiverStep<P> {
    method: Arc<Method<P>>,
}

impl<P> StepBehavior for ReceiverStep<P>
where
    P: Any + Send + Sync,
{
    fn start(
        &self,
        pattern: &str,
        fixtures: &ResourceBag,
        args: Vec<String>,
    ) -> Result<StepFuture, ResolutionError> {
        let (fixture, resource) = first_non_auto_inject_fixture(fixtures, pattern)?;
        let receiver = Arc::clone(resource).downcast::<P>().map_err(|_| {
            ResolutionError::ReceiverTypeMismatch {
                pattern: String::from(pattern),
                fixture: String::from(fixture),
                expected: type_name::<P>(),
            }
        })?;
        Ok((self.method)(receiver, args))
    }
}

struct DecoratedStep {
    keyword: StepKeyword,
    pattern: String,
    location: SourceLocation,
    behavior: Arc<dyn StepBehavior>,
}

/// Step declarations attached to page-object methods.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use futures_util::FutureExt;
/// use hookwise::steps::{DecoratedSteps, PomNode, StepKeyword, StepRegistry};
///
/// struct TodoPage;
///
/// let mut decorated = DecoratedSteps::new();
/// decorated.decorate::<TodoPage, _>(
///     StepKeyword::When,
///     "I add todo {string}",
///     "add_todo",
///     |_page: Arc<TodoPage>, _args| async { Ok(()) }.boxed(),
/// );
///
/// let mut registry = StepRegistry::new();
/// let node = PomNode::of::<TodoPage>("todoPage");
/// let linked = decorated.link_with_pom_node::<TodoPage>(&node, &mut registry);
/// assert_eq!(linked, 1);
/// ```
#[derive(Default)]
pub struct DecoratedSteps {
    entries: BTreeMap<MethodKey, DecoratedStep>,
}

impl DecoratedSteps {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a step declaration to `method` of page-object type `P`.
    ///
    /// Declaring the same method again replaces the earlier declaration.
    #[track_caller]
    pub fn decorate<P, F>(
        &mut self,
        keyword: StepKeyword,
        pattern: impl Into<String>,
        method: &'static str,
        body: F,
    ) -> &mut Self
    where
        P: Any + Send + Sync,
        F: Fn(Arc<P>, Vec<String>) -> StepFuture + Send + Sync + 'static,
    {
        let step = DecoratedStep {
            keyword,
            pattern: pattern.into(),
            location: SourceLocation::caller(),
            behavior: Arc::new(ReceiverStep::<P> {
                method: Arc::new(body),
            }),
        };
        self.entries.insert(MethodKey::of::<P>(method), step);
        self
    }

    /// Returns whether `method` of `P` carries a step declaration.
    #[must_use]
    pub fn is_decorated<P: Any>(&self, method: &'static str) -> bool {
        self.entries.contains_key(&MethodKey::of::<P>(method))
    }

    /// Register every decorated method of `P` as a step bound to `node`.
    ///
    /// Returns the number of steps registered. Methods of other types are
    /// left alone.
    pub fn link_with_pom_node<P: Any>(
        &self,
        node: &PomNode,
        registry: &mut StepRegistry,
    ) -> usize {
        let owner = TypeId::of::<P>();
        let mut linked = 0;
        for (key, step) in self.entries.iter().filter(|(key, _)| key.owner == owner) {
            debug!(
                method = key.method,
                pattern = %step.pattern,
                fixture = %node.fixture_name,
                "linking decorator step"
            );
            registry.register_step_definition(StepDefinition::bound_to_pom_node(
                step.keyword,
                step.pattern.clone(),
                step.location,
                node.clone(),
                Arc::clone(&step.behavior),
            ));
            linked += 1;
        }
        linked
    }

    /// Number of decorated methods across all types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no method is decorated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DecoratedSteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(key, step)| (key.method, &step.pattern)))
            .finish()
    }
}
