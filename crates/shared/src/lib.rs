//! # azure-setup-shared
//!
//! Shared foundations for the azure-setup workspace:
//!
//! - `ErrorEnvelope` and the `Result` alias used by every crate
//! - secret detection and masking
//! - the session context threaded through one setup run
//! - session-tagged bounded waits
//!
//! This crate has no workspace dependencies.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod redaction;
pub mod result;
pub mod session;
pub mod timeout;

pub use errors::{
    ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata, REDACTED_VALUE,
    redact_metadata,
};
pub use redaction::{MASK_VISIBLE_CHARS, REDACTED, SecretString, is_secret_key, mask_secret};
pub use result::{Result, ResultExt};
pub use session::{SessionContext, SessionId};
pub use timeout::{is_timeout, timeout_with_context};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
