//! Environment variable parsing for installer settings.
//!
//! Parsing is strict: a variable that is present must hold a valid value,
//! otherwise setup stops before the first prompt. Secret-looking values are
//! redacted in error metadata.

use azure_setup_shared::{ErrorCode, ErrorEnvelope, REDACTED_VALUE, is_secret_key};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Env var: override the assistant config file path.
pub const ENV_CONFIG_PATH: &str = "AZURE_SETUP_CONFIG_PATH";
/// Env var: probe timeout in milliseconds.
pub const ENV_PROBE_TIMEOUT_MS: &str = "AZURE_SETUP_PROBE_TIMEOUT_MS";
/// Env var: remote defaults feed URL.
pub const ENV_DEFAULTS_URL: &str = "AZURE_SETUP_DEFAULTS_URL";
/// Env var: remote defaults feed timeout in milliseconds.
pub const ENV_DEFAULTS_TIMEOUT_MS: &str = "AZURE_SETUP_DEFAULTS_TIMEOUT_MS";
/// Env var: skip auxiliary component installation (true/false).
pub const ENV_SKIP_EXTRAS: &str = "AZURE_SETUP_SKIP_EXTRAS";
/// Env var: tracing filter directive for diagnostics on stderr.
pub const ENV_LOG: &str = "AZURE_SETUP_LOG";

const ALL_VARS: [&str; 6] = [
    ENV_CONFIG_PATH,
    ENV_PROBE_TIMEOUT_MS,
    ENV_DEFAULTS_URL,
    ENV_DEFAULTS_TIMEOUT_MS,
    ENV_SKIP_EXTRAS,
    ENV_LOG,
];

/// Typed env-derived installer overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupEnv {
    /// Override for the config file path.
    pub config_path: Option<PathBuf>,
    /// Probe timeout override.
    pub probe_timeout_ms: Option<u64>,
    /// Remote defaults feed URL.
    pub defaults_url: Option<Box<str>>,
    /// Remote defaults feed timeout override.
    pub defaults_timeout_ms: Option<u64>,
    /// Skip auxiliary installs.
    pub skip_extras: Option<bool>,
    /// Tracing filter directive.
    pub log_filter: Option<Box<str>>,
}

impl SetupEnv {
    /// Parse from an explicit map (tests and embedding callers).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            config_path: parse_optional_trimmed(map, ENV_CONFIG_PATH)?
                .map(|raw| PathBuf::from(&*raw)),
            probe_timeout_ms: parse_optional_timeout_ms(map, ENV_PROBE_TIMEOUT_MS)?,
            defaults_url: parse_optional_url(map, ENV_DEFAULTS_URL)?,
            defaults_timeout_ms: parse_optional_timeout_ms(map, ENV_DEFAULTS_TIMEOUT_MS)?,
            skip_extras: parse_optional_bool(map, ENV_SKIP_EXTRAS)?,
            log_filter: parse_optional_trimmed(map, ENV_LOG)?,
        })
    }

    /// Parse from the process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let map = ALL_VARS
            .iter()
            .filter_map(|name| {
                std::env::var(name)
                    .ok()
                    .map(|value| ((*name).to_string(), value))
            })
            .collect();
        Self::from_map(&map)
    }
}

/// Env parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Timeout env var was not a positive integer.
    InvalidTimeout {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// URL env var was not an http(s) URL.
    InvalidUrl {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidTimeout { .. } => ErrorCode::new("config", "invalid_env_timeout"),
            Self::InvalidUrl { .. } => ErrorCode::new("config", "invalid_env_url"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidTimeout { var, .. } => {
                write!(formatter, "{var} must be a positive number of milliseconds")
            },
            Self::InvalidUrl { var, .. } => write!(formatter, "{var} must be an http(s) URL"),
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value }
            | EnvParseError::InvalidTimeout { var, value }
            | EnvParseError::InvalidUrl { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", redact_value(var, &value)),
        }
    }
}

fn present<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_trimmed(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    Ok(present(map, var)?.map(Box::from))
}

fn parse_optional_timeout_ms(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<u64>, EnvParseError> {
    let Some(trimmed) = present(map, var)? else {
        return Ok(None);
    };
    match trimmed.parse::<u64>() {
        Ok(value) if value > 0 => Ok(Some(value)),
        _ => Err(EnvParseError::InvalidTimeout {
            var,
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(trimmed) = present(map, var)? else {
        return Ok(None);
    };
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: trimmed.to_owned(),
        }),
    }
}

fn parse_optional_url(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(trimmed) = present(map, var)? else {
        return Ok(None);
    };
    let invalid = || EnvParseError::InvalidUrl {
        var,
        value: trimmed.to_owned(),
    };
    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(Some(parsed.as_str().into()))
}

fn redact_value(var: &str, value: &str) -> String {
    if is_secret_key(var) {
        REDACTED_VALUE.to_string()
    } else {
        value.to_string()
    }
}
