//! Configuration loading with layered precedence.
//!
//! Layers are composed manually with `MergeComposer` (lowest to highest):
//! application defaults, configuration file, environment variables,
//! command-line arguments. The CLI owns subcommand dispatch, so `AppConfig`
//! never parses arguments itself; `build_cli_overrides` lifts the global
//! flags into the top layer instead.
//!
//! # Environment variables
//!
//! Every recognised variable holds a timeout in milliseconds. A value that
//! does not parse as an unsigned integer fails the load instead of being
//! ignored, so a typo never silently falls back to the default.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::Env;
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};
use tracing::debug;

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV_VAR: &str = "HOOKWISE_CONFIG_PATH";

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name.
    env_var: &'static str,
    /// The JSON path segments, e.g. `["worker", "hook_timeout_ms"]`.
    path: &'static [&'static str],
}

const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "HOOKWISE_HOOK_TIMEOUT_MS",
        path: &["hook_timeout_ms"],
    },
    EnvVarSpec {
        env_var: "HOOKWISE_WORKER_HOOK_TIMEOUT_MS",
        path: &["worker", "hook_timeout_ms"],
    },
    EnvVarSpec {
        env_var: "HOOKWISE_STEPS_TIMEOUT_MS",
        path: &["steps", "timeout_ms"],
    },
];

/// Returns the environment variable names recognised by the config loader.
///
/// Tests use this to clear every `HOOKWISE_*` variable without keeping a
/// second list in sync.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS
        .iter()
        .map(|spec| spec.env_var)
        .chain([CONFIG_PATH_ENV_VAR])
        .collect()
}

/// Load a configuration file and push it to the composer.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    debug!(%path, "loaded configuration file");
    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration with full layer precedence from the process
/// environment.
///
/// # Errors
///
/// See [`load_config_with_env`].
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &mockable::DefaultEnv::new())
}

/// Load configuration with full layer precedence.
///
/// 1. Application defaults
/// 2. Configuration file (`--config`, `HOOKWISE_CONFIG_PATH`, then discovery)
/// 3. `HOOKWISE_*` environment variables read through `env`
/// 4. Command-line flags
///
/// The merged configuration is validated before it is returned.
///
/// # Errors
///
/// Returns `ConfigError` if a configuration file is malformed, a typed
/// environment variable does not parse, the layers cannot be merged, or a
/// configured timeout is zero.
pub fn load_config_with_env<E: Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    if let Some(path) = resolve_config_path(cli, env) {
        load_config_file(&path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.validate()?;
    Ok(config)
}

/// Pick the configuration file to load, if any exists.
fn resolve_config_path<E: Env>(cli: &Cli, env: &E) -> Option<Utf8PathBuf> {
    cli.config
        .clone()
        .or_else(|| env.string(CONFIG_PATH_ENV_VAR).map(Utf8PathBuf::from))
        .filter(|path| path.exists())
        .or_else(|| {
            let discovery = ConfigDiscovery::builder("hookwise")
                .config_file_name("config.toml")
                .dotfile_name(".hookwise.toml")
                .build();
            discovery
                .candidates()
                .into_iter()
                .filter(|path| path.exists())
                .find_map(|path| Utf8PathBuf::try_from(path).ok())
        })
}

/// Collect `HOOKWISE_*` environment variables into a JSON value.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a variable is not an unsigned
/// integer.
fn collect_env_vars<E: Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };
        let millis = raw_value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue {
                field: String::from(spec.env_var),
                reason: format!("expected unsigned integer, got '{raw_value}'"),
            })?;
        insert_at_path(&mut root, spec.path, Value::Number(millis.into()));
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Insert a value at a nested path in a JSON map, creating intermediate
/// objects as needed.
fn insert_at_path(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((&field, parents)) = path.split_last() else {
        return;
    };

    let mut current = root;
    for &segment in parents {
        let entry = current
            .entry(String::from(segment))
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return;
        };
        current = obj;
    }

    current.insert(String::from(field), value);
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    cli.hook_timeout_ms.map_or(Value::Null, |millis| {
        let mut overrides = Map::new();
        overrides.insert(
            String::from("hook_timeout_ms"),
            Value::Number(millis.into()),
        );
        Value::Object(overrides)
    })
}
