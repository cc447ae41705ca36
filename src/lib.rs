//! Hook orchestration and fixture injection for BDD test runs.
//!
//! `hookwise` sits between a test runner and the code authors attach to
//! scenarios. It keeps an ordered registry of before and after hooks, gates
//! each hook by a Cucumber tag expression, and runs the selected hooks with
//! per-hook timeouts: before hooks stop at the first failure while after
//! hooks always run to completion.
//!
//! Hooks and steps receive their inputs from a [`fixtures::ResourceBag`].
//! The bag carries user fixtures alongside the auto-injected `$testInfo`,
//! `$test` and `$tags` entries, which never count as fixtures a hook or step
//! depends on.
//!
//! Steps can also be declared as methods of page-object types. Such a step
//! receives its page object as the single non-auto-injected fixture in the
//! bag; zero or several candidates are reported as resolution errors.
//!
//! # Modules
//!
//! - [`config`]: Timeout configuration with layered precedence (CLI > env > file > defaults)
//! - [`error`]: Semantic error types for the library
//! - [`fixtures`]: Resource bags, auto-inject names and fixture-name resolution
//! - [`hooks`]: Hook declaration, registry and execution pipeline
//! - [`location`]: Declaration-site capture
//! - [`steps`]: Step definitions and page-object decorator dispatch
//! - [`tags`]: Tag expressions parsed with `gherkin` and evaluated against scenario tags

pub mod config;
pub mod error;
pub mod fixtures;
pub mod hooks;
pub mod location;
pub mod steps;
pub mod tags;

mod timeout;
