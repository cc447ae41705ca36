//! Registered step definitions.

use std::collections::BTreeSet;

use tracing::debug;

use super::definition::{StepDefinition, StepKeyword};
use crate::fixtures::names_needed_by;

/// Every step definition known to a test run, in registration order.
#[derive(Debug, Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step definition.
    pub fn register_step_definition(&mut self, definition: StepDefinition) {
        debug!(
            keyword = %definition.keyword(),
            pattern = definition.pattern(),
            location = %definition.location(),
            "registered step"
        );
        self.definitions.push(definition);
    }

    /// All definitions in registration order.
    #[must_use]
    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }

    /// The first definition declared with `keyword` and exactly `pattern`.
    #[must_use]
    pub fn find(&self, keyword: StepKeyword, pattern: &str) -> Option<&StepDefinition> {
        self.definitions.iter().find(|definition| {
            definition.keyword() == keyword && definition.pattern() == pattern
        })
    }

    /// Fixtures that must be prepared before `definition` can run.
    ///
    /// A step bound to a page-object node needs exactly that node's fixture.
    /// Other steps need the names they declared, auto-injected ones excluded.
    #[must_use]
    pub fn fixture_names_for(definition: &StepDefinition) -> BTreeSet<String> {
        definition.pom_node().map_or_else(
            || names_needed_by(definition),
            |node| BTreeSet::from([node.fixture_name.clone()]),
        )
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns whether no definition was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
