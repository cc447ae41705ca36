//! Configuration data types for hookwise.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Worker hook configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Default timeout for worker hooks, in milliseconds. Falls back to the
    /// scenario hook timeout when unset.
    pub hook_timeout_ms: Option<u64>,
}

/// Step configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StepsConfig {
    /// Default timeout for steps, in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Root application configuration.
///
/// Loaded from configuration files, environment variables and command-line
/// arguments. The precedence order (lowest to highest) is: defaults,
/// configuration file, environment variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path given with `--config`
/// 2. Path in the `HOOKWISE_CONFIG_PATH` environment variable
/// 3. `.hookwise.toml` in the current working directory
/// 4. `.hookwise.toml` in the home directory
/// 5. `~/.config/hookwise/config.toml` (XDG default)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "HOOKWISE",
    discovery(
        app_name = "hookwise",
        env_var = "HOOKWISE_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".hookwise.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Default timeout for scenario hooks, in milliseconds.
    pub hook_timeout_ms: Option<u64>,

    /// Worker hook configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub worker: WorkerConfig,

    /// Step configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub steps: StepsConfig,
}

impl AppConfig {
    /// Checks that every configured timeout is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first timeout set to
    /// zero.
    pub fn validate(&self) -> Result<()> {
        let timeouts = [
            ("hook_timeout_ms", self.hook_timeout_ms),
            ("worker.hook_timeout_ms", self.worker.hook_timeout_ms),
            ("steps.timeout_ms", self.steps.timeout_ms),
        ];
        timeouts
            .into_iter()
            .find(|(_, value)| *value == Some(0))
            .map_or(Ok(()), |(field, _)| {
                Err(ConfigError::InvalidValue {
                    field: String::from(field),
                    reason: String::from("timeout must be greater than zero"),
                }
                .into())
            })
    }

    /// Default step timeout.
    #[must_use]
    pub fn step_timeout(&self) -> Option<Duration> {
        self.steps.timeout_ms.map(Duration::from_millis)
    }
}
