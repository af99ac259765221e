//! # azure-setup-ports
//!
//! Port traits for the azure-setup hexagonal architecture.
//!
//! This crate defines the capabilities the setup flow needs from the outside
//! world (prompting, probing, config storage, defaults, extras, logging).
//! It depends only on `domain` and `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits that perform network or process I/O.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod config_store;
pub mod defaults;
pub mod installer;
pub mod logger;
pub mod probe;
pub mod prompt;

pub use config_store::*;
pub use defaults::*;
pub use installer::*;
pub use logger::*;
pub use probe::*;
pub use prompt::*;

// Domain types used in port signatures, so adapters can implement ports
// without depending on `azure-setup-domain` directly.
pub use azure_setup_domain::{ConfigDocument, Credential, EndpointDescriptor, ProbeResult};
