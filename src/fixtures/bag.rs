//! Name-addressed collection of initialised resources.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{
    BDD_CONTEXT, ScenarioContext, TAGS, TEST, TEST_INFO, WORKER_CONTEXT, WORKER_INFO,
    WorkerContext,
};

/// A shared, type-erased resource value.
pub type Resource = Arc<dyn Any + Send + Sync>;

/// The resources available to one scenario or worker, addressed by name.
///
/// Cloning a bag is cheap: entries are reference counted, so a clone shares
/// every value with the original. The engine reads entries and builds
/// per-call copies but never changes an entry it was given.
#[derive(Clone, Default)]
pub struct ResourceBag {
    entries: BTreeMap<String, Resource>,
}

impl ResourceBag {
    /// Create an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any previous entry with the same name.
    pub fn insert<T>(&mut self, name: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.entries.insert(name.into(), Arc::new(value));
    }

    /// Add an already shared resource.
    pub fn insert_shared(&mut self, name: impl Into<String>, value: Resource) {
        self.entries.insert(name.into(), value);
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.insert(name, value);
        self
    }

    /// Borrow the resource `name` as `T`.
    ///
    /// Returns `None` when the entry is absent or holds another type.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        let value: &(dyn Any + Send + Sync) = &**self.entries.get(name)?;
        value.downcast_ref::<T>()
    }

    /// Share the resource `name` as `T`.
    #[must_use]
    pub fn get_shared<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        Arc::clone(self.entries.get(name)?).downcast::<T>().ok()
    }

    /// The type-erased resource `name`.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.entries.get(name)
    }

    /// Returns whether an entry called `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in lexical name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the bag has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The scenario context, when this bag belongs to a scenario.
    #[must_use]
    pub fn scenario_context(&self) -> Option<&ScenarioContext> {
        self.get::<ScenarioContext>(BDD_CONTEXT)
    }

    /// The worker context, when this bag belongs to a worker.
    #[must_use]
    pub fn worker_context(&self) -> Option<&WorkerContext> {
        self.get::<WorkerContext>(WORKER_CONTEXT)
    }

    /// The scenario's tag set, or an empty one when no context is present.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.scenario_context()
            .map(|context| context.tags.as_slice())
            .unwrap_or_default()
    }

    /// Build the effective argument bag of a scenario call.
    ///
    /// Every entry of `self` is kept and the auto-injected handles derived
    /// from `context` are laid over them.
    #[must_use]
    pub fn with_auto_inject(&self, context: &ScenarioContext) -> Self {
        self.clone()
            .with(TEST_INFO, context.test_info.clone())
            .with(TEST, context.test.clone())
            .with(TAGS, context.tags.clone())
    }

    /// Build the effective argument bag of a worker call.
    #[must_use]
    pub fn with_worker_auto_inject(&self, context: &WorkerContext) -> Self {
        self.clone().with(WORKER_INFO, context.worker_info.clone())
    }
}

impl fmt::Debug for ResourceBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl<S: Into<String>> FromIterator<(S, Resource)> for ResourceBag {
    fn from_iter<I: IntoIterator<Item = (S, Resource)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}
