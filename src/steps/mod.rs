//! Step definitions and decorator-step dispatch.
//!
//! Plain steps receive the resource bag and the captures of their pattern.
//! Decorator steps are methods of page-object types: they are declared in a
//! [`DecoratedSteps`] table, linked to the fixture that provides the page
//! object, and dispatched against the one bag entry that is not
//! auto-injected.

mod decorator;
mod definition;
mod registry;

pub use decorator::{DecoratedSteps, MethodKey, PomNode, first_non_auto_inject_fixture};
pub use definition::{StepDefinition, StepFuture, StepKeyword};
pub use registry::StepRegistry;
