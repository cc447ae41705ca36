//! Unit tests for hook declaration, selection and execution.
//!
//! - [`helpers`] - World recorder, runtime fixture and hook behaviours
//! - [`definition_tests`] - Declaration shapes and option validation
//! - [`registry_tests`] - Ordering, tag filtering and fixture names
//! - [`pipeline_tests`] - Phase policies, timeouts and injection

mod helpers;
