//! Integration tests for env parsing feeding effective settings.

use azure_setup_config::{
    ENV_CONFIG_PATH, ENV_DEFAULTS_TIMEOUT_MS, ENV_DEFAULTS_URL, ENV_PROBE_TIMEOUT_MS,
    ENV_SKIP_EXTRAS, SettingsOverrides, SetupEnv, SetupSettings,
};
use azure_setup_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn env_values_flow_into_settings() -> Result<(), Box<dyn Error>> {
    let env = SetupEnv::from_map(&env_map(&[
        (ENV_CONFIG_PATH, " /tmp/assistant/opencode.json "),
        (ENV_PROBE_TIMEOUT_MS, "2500"),
        (ENV_DEFAULTS_URL, "https://defaults.example.com/azure.json"),
        (ENV_DEFAULTS_TIMEOUT_MS, "750"),
        (ENV_SKIP_EXTRAS, "yes"),
    ]))?;

    let settings = SetupSettings::resolve_with_home(&env, &SettingsOverrides::default(), None)?;

    assert_eq!(
        settings.config_path,
        PathBuf::from("/tmp/assistant/opencode.json")
    );
    assert_eq!(settings.probe_timeout, Duration::from_millis(2_500));
    assert_eq!(
        settings.defaults_url.as_deref(),
        Some("https://defaults.example.com/azure.json")
    );
    assert_eq!(settings.defaults_timeout, Duration::from_millis(750));
    assert!(settings.skip_extras);
    Ok(())
}

#[test]
fn invalid_env_surfaces_as_config_error() {
    let error = SetupEnv::from_map(&env_map(&[(ENV_PROBE_TIMEOUT_MS, "soon")]))
        .map_err(ErrorEnvelope::from)
        .err();

    assert_eq!(
        error.map(|error| error.code),
        Some(ErrorCode::new("config", "invalid_env_timeout"))
    );
}
