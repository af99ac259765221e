//! Effective installer settings.
//!
//! Precedence (highest wins): command-line overrides, environment
//! (`SetupEnv`), built-in defaults.

use crate::SetupEnv;
use azure_setup_shared::{ErrorCode, ErrorEnvelope};
use std::path::PathBuf;
use std::time::Duration;

/// Default bounded wait for the connectivity probe.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 15_000;

/// Default bounded wait for the remote defaults feed.
pub const DEFAULT_DEFAULTS_TIMEOUT_MS: u64 = 3_000;

/// Config file location relative to the home directory.
pub const CONFIG_RELATIVE_PATH: [&str; 3] = [".config", "opencode", "opencode.json"];

/// Command-line overrides; `None` defers to env and defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `--config <path>`.
    pub config_path: Option<PathBuf>,
    /// `--probe-timeout-ms <n>`.
    pub probe_timeout_ms: Option<u64>,
    /// `--skip-extras`.
    pub skip_extras: bool,
}

/// Validated settings for one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupSettings {
    /// Assistant config file to read and write.
    pub config_path: PathBuf,
    /// Probe bounded wait.
    pub probe_timeout: Duration,
    /// Remote defaults feed, if configured.
    pub defaults_url: Option<Box<str>>,
    /// Remote defaults bounded wait.
    pub defaults_timeout: Duration,
    /// Skip auxiliary installs.
    pub skip_extras: bool,
}

impl SetupSettings {
    /// Resolve settings, locating the home directory when no path is given.
    pub fn resolve(env: &SetupEnv, overrides: &SettingsOverrides) -> Result<Self, ErrorEnvelope> {
        Self::resolve_with_home(env, overrides, dirs::home_dir())
    }

    /// Resolve settings against an explicit home directory.
    pub fn resolve_with_home(
        env: &SetupEnv,
        overrides: &SettingsOverrides,
        home: Option<PathBuf>,
    ) -> Result<Self, ErrorEnvelope> {
        let config_path = match overrides
            .config_path
            .clone()
            .or_else(|| env.config_path.clone())
        {
            Some(path) => path,
            None => default_config_path(home)?,
        };

        let probe_timeout_ms = overrides
            .probe_timeout_ms
            .or(env.probe_timeout_ms)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT_MS);
        if probe_timeout_ms == 0 {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "probe timeout must be greater than zero",
            ));
        }

        Ok(Self {
            config_path,
            probe_timeout: Duration::from_millis(probe_timeout_ms),
            defaults_url: env.defaults_url.clone(),
            defaults_timeout: Duration::from_millis(
                env.defaults_timeout_ms
                    .unwrap_or(DEFAULT_DEFAULTS_TIMEOUT_MS),
            ),
            skip_extras: overrides.skip_extras || env.skip_extras.unwrap_or(false),
        })
    }
}

/// `~/.config/opencode/opencode.json` under `home`.
pub fn default_config_path(home: Option<PathBuf>) -> Result<PathBuf, ErrorEnvelope> {
    let Some(home) = home else {
        return Err(ErrorEnvelope::expected(
            ErrorCode::new("config", "home_not_found"),
            "cannot locate the home directory; pass --config <path>",
        ));
    };
    Ok(CONFIG_RELATIVE_PATH
        .iter()
        .fold(home, |path, segment| path.join(segment)))
}
