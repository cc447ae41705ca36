//! Before and after hooks for scenarios and workers.
//!
//! Hooks are declared into a [`HookRegistry`], optionally gated by a tag
//! expression, and run by a [`HookPipeline`]:
//!
//! - before hooks run in declaration order and stop at the first failure;
//! - after hooks run in reverse declaration order, all of them, and the
//!   first failure is reported once teardown has finished.
//!
//! Each hook may carry its own timeout. A hook that overruns is abandoned
//! and reported as [`crate::error::HookError::Timeout`].

mod definition;
mod pipeline;
mod registry;

pub use definition::{
    Hook, HookArgs, HookFuture, HookOptions, HookPhase, HookScope, ScenarioHook,
    ScenarioHookBehavior, WorkerHook, WorkerHookBehavior,
};
pub use pipeline::{HookPipeline, PipelineSettings, ScenarioRun};
pub use registry::{HookList, HookRegistry};

#[cfg(test)]
mod tests;
