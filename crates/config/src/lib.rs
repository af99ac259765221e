//! # azure-setup-config
//!
//! Installer settings and config-file encoding:
//!
//! - `SetupEnv`: strict parsing of `AZURE_SETUP_*` environment variables
//! - `SetupSettings`: effective settings after flags, env, and defaults
//! - `decode_document` / `encode_document`: the assistant config file format
//!
//! This crate depends on `domain` and `shared` only.

/// Text encoding of the assistant config document.
pub mod codec;
/// Environment variable parsing.
pub mod env;
/// Effective settings resolution.
pub mod settings;

pub use codec::{DecodedDocument, decode_document, encode_document};
pub use env::{
    ENV_CONFIG_PATH, ENV_DEFAULTS_TIMEOUT_MS, ENV_DEFAULTS_URL, ENV_LOG, ENV_PROBE_TIMEOUT_MS,
    ENV_SKIP_EXTRAS, EnvParseError, SetupEnv,
};
pub use settings::{
    CONFIG_RELATIVE_PATH, DEFAULT_DEFAULTS_TIMEOUT_MS, DEFAULT_PROBE_TIMEOUT_MS,
    SettingsOverrides, SetupSettings, default_config_path,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
