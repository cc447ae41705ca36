//! Named resources ("fixtures") and the dependency names behaviours declare.
//!
//! Hooks and steps never construct fixtures. An external fixture lifecycle
//! manager materialises them into a [`ResourceBag`]; this module only
//! answers two questions:
//!
//! - which names a behaviour needs before it can run ([`names_needed_by`]);
//! - what the effective argument bag of one invocation looks like
//!   ([`ResourceBag::with_auto_inject`]).
//!
//! A small set of names is always available without being requested. Those
//! auto-injected names are excluded from dependency sets so callers never
//! have to wire them explicitly.

mod bag;
mod context;

use std::collections::BTreeSet;

pub use bag::{Resource, ResourceBag};
pub use context::{ScenarioContext, TestHandle, TestInfo, WorkerContext, WorkerInfo};

/// Bag key of the [`ScenarioContext`] supplied for every scenario.
pub const BDD_CONTEXT: &str = "$bddContext";

/// Bag key of the world object scenario hooks run against.
pub const BDD_WORLD: &str = "$bddWorld";

/// Bag key of the [`WorkerContext`] supplied for every worker.
pub const WORKER_CONTEXT: &str = "$workerContext";

/// Auto-injected handle describing the running test.
pub const TEST_INFO: &str = "$testInfo";

/// Auto-injected handle of the test type the scenario was generated for.
pub const TEST: &str = "$test";

/// Auto-injected tag set of the running scenario.
pub const TAGS: &str = "$tags";

/// Auto-injected handle describing the running worker.
pub const WORKER_INFO: &str = "$workerInfo";

/// Names injected into every scenario hook and step call.
pub const AUTO_INJECT_FIXTURES: [&str; 3] = [TEST_INFO, TEST, TAGS];

/// Names injected into every worker hook call.
pub const WORKER_AUTO_INJECT_FIXTURES: [&str; 1] = [WORKER_INFO];

/// Returns whether `name` is injected into scenario calls automatically.
#[must_use]
pub fn is_auto_inject_fixture(name: &str) -> bool {
    AUTO_INJECT_FIXTURES.contains(&name)
}

/// Returns whether `name` is injected into worker calls automatically.
#[must_use]
pub fn is_worker_auto_inject_fixture(name: &str) -> bool {
    WORKER_AUTO_INJECT_FIXTURES.contains(&name)
}

/// The shape of the single parameter a behaviour was authored with.
///
/// Behaviours request fixtures by naming them in a destructured parameter.
/// Rather than reflecting over parameter syntax, the names are declared
/// explicitly when the behaviour is registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FixtureParams {
    /// The behaviour takes no parameter.
    #[default]
    None,
    /// The behaviour takes the whole bag without naming any entry.
    Opaque,
    /// The behaviour destructures these names out of the bag.
    Destructured(Vec<String>),
}

impl FixtureParams {
    /// Declare a destructured parameter with the given names.
    pub fn destructured<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Destructured(names.into_iter().map(Into::into).collect())
    }

    /// Names listed in the parameter, auto-injected ones included.
    #[must_use]
    pub fn declared_names(&self) -> &[String] {
        match self {
            Self::Destructured(names) => names,
            Self::None | Self::Opaque => &[],
        }
    }
}

/// Something that declares which fixtures it destructures.
pub trait DeclaresFixtures {
    /// The declared parameter shape.
    fn fixture_params(&self) -> &FixtureParams;
}

impl DeclaresFixtures for FixtureParams {
    fn fixture_params(&self) -> &FixtureParams {
        self
    }
}

/// Compute the fixture names a behaviour needs, auto-injected names excluded.
///
/// A behaviour with no parameter, or one that takes the bag opaquely, needs
/// nothing.
#[must_use]
pub fn names_needed_by<D>(callable: &D) -> BTreeSet<String>
where
    D: DeclaresFixtures + ?Sized,
{
    callable
        .fixture_params()
        .declared_names()
        .iter()
        .filter(|name| !is_auto_inject_fixture(name))
        .cloned()
        .collect()
}
