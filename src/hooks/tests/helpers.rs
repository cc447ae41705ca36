//! Shared fixtures and hook behaviours for hook tests.

use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use rstest::fixture;

use crate::fixtures::{BDD_CONTEXT, BDD_WORLD, Resource, ResourceBag, ScenarioContext};
use crate::hooks::HookFuture;

pub(super) type RuntimeFixture = std::io::Result<tokio::runtime::Runtime>;

/// Fixture providing a single-threaded runtime with timers enabled.
#[fixture]
pub(super) fn runtime() -> RuntimeFixture {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
}

/// World object that records what ran against it.
#[derive(Debug, Default)]
pub(super) struct World {
    events: Mutex<Vec<String>>,
}

impl World {
    pub(super) fn record(&self, event: impl Into<String>) {
        self.events
            .lock()
            .expect("events lock should not be poisoned")
            .push(event.into());
    }

    pub(super) fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("events lock should not be poisoned")
            .clone()
    }
}

/// Failure raised by the failing behaviours, used to check pass-through.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("hook {0} failed")]
pub(super) struct HookFailed(pub(super) &'static str);

/// Fixture providing a fresh world.
#[fixture]
pub(super) fn world() -> Arc<World> {
    Arc::new(World::default())
}

/// Build a scenario bag holding `world` and a context tagged with `tags`.
pub(super) fn scenario_bag(world: &Arc<World>, tags: &[&str]) -> ResourceBag {
    let shared: Resource = Arc::clone(world) as Resource;
    let mut bag = ResourceBag::new().with(
        BDD_CONTEXT,
        ScenarioContext::new("adds a todo", tags.iter().copied()),
    );
    bag.insert_shared(BDD_WORLD, shared);
    bag
}

pub(super) fn tag_set(tags: &[&str]) -> Vec<String> {
    tags.iter().copied().map(String::from).collect()
}

/// Behaviour that records `label` and succeeds.
pub(super) fn recording(
    label: &'static str,
) -> impl Fn(Arc<World>, ResourceBag) -> HookFuture + Send + Sync + 'static {
    move |world, _fixtures| {
        world.record(label);
        async { Ok(()) }.boxed()
    }
}

/// Behaviour that records `label` and fails with [`HookFailed`].
pub(super) fn failing(
    label: &'static str,
) -> impl Fn(Arc<World>, ResourceBag) -> HookFuture + Send + Sync + 'static {
    move |world, _fixtures| {
        world.record(label);
        async move { Err(eyre::Report::new(HookFailed(label))) }.boxed()
    }
}

/// Behaviour that records `label` and never settles.
pub(super) fn stalling(
    label: &'static str,
) -> impl Fn(Arc<World>, ResourceBag) -> HookFuture + Send + Sync + 'static {
    move |world, _fixtures| {
        world.record(label);
        std::future::pending().boxed()
    }
}

/// Behaviour that succeeds without recording anything.
pub(super) fn noop() -> impl Fn(Arc<World>, ResourceBag) -> HookFuture + Send + Sync + 'static {
    |_world, _fixtures| async { Ok(()) }.boxed()
}
