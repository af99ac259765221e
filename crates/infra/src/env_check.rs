//! Environment validation and settings resolution for CLI surfaces.

use azure_setup_config::{SettingsOverrides, SetupEnv, SetupSettings};
use azure_setup_shared::ErrorEnvelope;
use std::collections::BTreeMap;

/// Infra-level error type (shared error envelope).
pub type InfraError = ErrorEnvelope;

/// Infra-level result type.
pub type InfraResult<T> = Result<T, InfraError>;

/// Validate that the provided env map parses into usable settings.
pub fn validate_env_parsing(env: &BTreeMap<String, String>) -> InfraResult<()> {
    let parsed = SetupEnv::from_map(env)?;
    let _ = SetupSettings::resolve(&parsed, &SettingsOverrides::default())?;
    Ok(())
}

/// Parse the installer's variables from the process environment.
pub fn load_env() -> InfraResult<SetupEnv> {
    Ok(SetupEnv::from_std_env()?)
}

/// Resolve effective settings from parsed env values and CLI flags.
pub fn resolve_settings(env: &SetupEnv, overrides: &SettingsOverrides) -> InfraResult<SetupSettings> {
    SetupSettings::resolve(env, overrides)
}
