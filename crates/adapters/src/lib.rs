//! # azure-setup-adapters
//!
//! Adapter implementations for ports: config file store, HTTP probe,
//! defaults feed, terminal prompts, component installer, and logging.
//! This crate depends on `ports`, `domain`, `config`, and `shared`.

pub mod config_store;
pub mod defaults_feed;
pub mod installer;
pub mod logger;
pub mod probe;
pub mod prompt;

pub use config_store::{BACKUP_SUFFIX, FileConfigStore};
pub use defaults_feed::{HttpDefaultsFeed, HttpDefaultsFeedConfig};
pub use installer::{ComponentRecipe, DEFAULT_INSTALL_TIMEOUT, PackageManagerInstaller};
pub use logger::TracingLogger;
pub use probe::{API_KEY_HEADER, AzureChatProbe, AzureChatProbeConfig};
pub use prompt::{TerminalPrompter, format_notice, map_dialoguer_error};

/// Crate version, used by layering smoke tests.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
