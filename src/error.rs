//! Semantic error types for hookwise.
//!
//! Conditions a caller might inspect (a malformed declaration, a timed-out
//! hook, an unresolvable decorator receiver) are modelled as `thiserror`
//! enums. Failures raised by user-authored hook and step bodies stay opaque
//! (`eyre::Report`) and travel through the engine untouched so their original
//! type can still be recovered with `downcast_ref`.

use std::sync::Arc;

use thiserror::Error;

use crate::hooks::HookPhase;

/// Errors raised while declaring hooks or steps.
///
/// These are fatal to start-up: a declaration that fails here never reaches
/// the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A tag expression could not be parsed.
    #[error("tag expression \"{expression}\" could not be parsed: {reason}")]
    InvalidTagExpression {
        /// The expression as written by the author.
        expression: String,
        /// What the parser expected or found.
        reason: String,
    },

    /// A hook or step option has an unusable value.
    #[error("invalid hook option '{option}': {reason}")]
    InvalidOption {
        /// The option name.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors raised while locating the resources a hook or step runs against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A decorator step received no user fixture to act as its receiver.
    #[error("no suitable fixture found for step pattern `{pattern}`")]
    NoSuitableFixture {
        /// The step pattern being dispatched.
        pattern: String,
    },

    /// A decorator step received more than one candidate receiver.
    #[error("several suitable fixtures found for step pattern `{pattern}`: {candidates}")]
    SeveralSuitableFixtures {
        /// The step pattern being dispatched.
        pattern: String,
        /// Comma-separated candidate fixture names.
        candidates: String,
    },

    /// The resolved receiver is not of the page-object type the step expects.
    #[error("fixture '{fixture}' cannot be used as '{expected}' for step pattern `{pattern}`")]
    ReceiverTypeMismatch {
        /// The step pattern being dispatched.
        pattern: String,
        /// The fixture that was resolved.
        fixture: String,
        /// The receiver type the step was declared on.
        expected: &'static str,
    },

    /// A resource the engine itself requires is absent from the bag.
    #[error("required resource '{name}' is missing from the resource bag")]
    MissingResource {
        /// The resource bag key.
        name: String,
    },
}

/// Errors raised while running a hook phase.
#[derive(Debug, Error)]
pub enum HookError {
    /// A hook did not settle within its timeout.
    #[error("{message}")]
    Timeout {
        /// Phase of the hook that timed out.
        phase: HookPhase,
        /// Diagnostic name of the hook, when declared.
        name: Option<String>,
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
        /// Human-readable message embedding the fields above.
        message: String,
    },

    /// The hook body failed. The report is passed through unchanged.
    #[error(transparent)]
    Behavior(eyre::Report),

    /// The engine could not assemble what the hook needs.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl HookError {
    /// Build a timeout error whose message identifies the hook.
    ///
    /// The message reads `before hook "name" timeout (500 ms)`, omitting the
    /// quoted name for anonymous hooks.
    #[must_use]
    pub fn timeout(phase: HookPhase, name: Option<&str>, timeout_ms: u64) -> Self {
        let label = name.map(|n| format!("\"{n}\" ")).unwrap_or_default();
        Self::Timeout {
            phase,
            name: name.map(String::from),
            timeout_ms,
            message: format!("{phase} hook {label}timeout ({timeout_ms} ms)"),
        }
    }

    /// Returns whether this error is a timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors raised while dispatching a step.
#[derive(Debug, Error)]
pub enum StepError {
    /// The step did not settle within its timeout.
    #[error("step `{pattern}` timeout ({timeout_ms} ms)")]
    Timeout {
        /// Pattern of the step that timed out.
        pattern: String,
        /// The timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The step body failed. The report is passed through unchanged.
    #[error(transparent)]
    Behavior(eyre::Report),

    /// The step receiver could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Top-level error type for hookwise.
///
/// Aggregates every domain error so library embedders can use a single
/// `Result` type. The binary converts it to `eyre::Report` at the boundary.
#[derive(Debug, Error)]
pub enum HookwiseError {
    /// A hook or step declaration was rejected.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// A hook phase failed.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// A step dispatch failed.
    #[error(transparent)]
    Step(#[from] StepError),

    /// A decorator receiver or engine resource could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A specialised `Result` type for hookwise operations.
pub type Result<T> = std::result::Result<T, HookwiseError>;
