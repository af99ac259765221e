//! # azure-setup-infra
//!
//! Infrastructure wiring and runtime composition.
//! This crate depends on `app`, `adapters`, `config`, and `shared`.

/// Local CLI orchestration helpers.
pub mod cli_local;
/// Environment validation helpers used by CLI surfaces.
pub mod env_check;

pub use cli_local::{
    StoredConfigSummary, build_setup_deps, origin_str, run_setup_local, show_config_local,
};
pub use env_check::{InfraError, InfraResult, load_env, resolve_settings, validate_env_parsing};

// Re-export redaction utilities for CLI boundary sanitization
pub use azure_setup_shared::{is_secret_key, mask_secret};

/// Returns the infra crate version.
#[must_use]
pub const fn infra_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
