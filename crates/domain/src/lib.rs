//! # azure-setup-domain
//!
//! Domain model for provisioning an AI coding assistant against Azure OpenAI:
//!
//! - **Endpoint** - `EndpointDescriptor`, `EndpointDefaults`, `parse_endpoint`
//! - **Credential** - masked API key handling
//! - **Probe** - `ProbeResult` classification of a connectivity check
//! - **Document** - `ConfigDocument`, the owned provider slice and its merge
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate plus serialization and URL parsing
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod credential;
pub mod document;
pub mod endpoint;
pub mod probe;

pub use credential::Credential;
pub use document::{
    ConfigDocument, PROVIDER_DISPLAY_NAME, PROVIDER_NAME, PROVIDER_PACKAGE, ProviderSettings,
    SCHEMA_URL,
};
pub use endpoint::{
    BUILTIN_API_VERSION, BUILTIN_DEPLOYMENT, EndpointDefaults, EndpointDescriptor, EndpointError,
    ROOT_SEGMENT, parse_endpoint,
};
pub use probe::{PROBE_BODY_DISPLAY_LIMIT, ProbeFailure, ProbeResult};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
