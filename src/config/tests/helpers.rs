//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use ortho_config::MergeComposer;
use ortho_config::serde_json::json;
use rstest::fixture;

use crate::config::AppConfig;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r"
        hook_timeout_ms = 5000

        [worker]
        hook_timeout_ms = 30000

        [steps]
        timeout_ms = 10000
    ";

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r"
        [steps]
        timeout_ms = 250
    ";

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(
        config.hook_timeout_ms.is_none(),
        "hook_timeout_ms should be None"
    );
    assert!(
        config.worker.hook_timeout_ms.is_none(),
        "worker.hook_timeout_ms should be None"
    );
    assert!(
        config.steps.timeout_ms.is_none(),
        "steps.timeout_ms should be None"
    );
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for
/// testing layer precedence.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "hook_timeout_ms": 1000,
            "steps": { "timeout_ms": 2000 }
        }),
        None,
    );

    composer.push_environment(json!({
        "hook_timeout_ms": 1500
    }));

    Ok(composer)
}
