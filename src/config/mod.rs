//! Configuration system for hookwise.
//!
//! This module provides the configuration structures and CLI definitions for
//! the hookwise command-line tool and the timeout defaults applied by the hook
//! pipeline and step dispatcher. Layers are merged with `ortho_config`: CLI
//! flags override environment variables, which override configuration files,
//! which override defaults.
//!
//! The configuration file is expected at `~/.config/hookwise/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! hook_timeout_ms = 5000
//!
//! [worker]
//! hook_timeout_ms = 30000
//!
//! [steps]
//! timeout_ms = 10000
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{CheckArgs, Cli, Commands, EvalArgs};
pub use loader::{CONFIG_PATH_ENV_VAR, env_var_names, load_config, load_config_with_env};
pub use types::{AppConfig, StepsConfig, WorkerConfig};
