//! Result helpers for shared error handling.

use crate::errors::{ErrorCode, ErrorEnvelope};

/// Shared result type used across the workspace.
pub type Result<T, E = ErrorEnvelope> = std::result::Result<T, E>;

/// Extension helpers for attaching context to envelope results.
pub trait ResultExt<T> {
    /// Attach a metadata entry to the error, if any.
    fn with_context(self, key: &str, value: impl Into<String>) -> Result<T>;

    /// Re-code the error as an expected failure with a user-facing message.
    fn or_expected(self, code: ErrorCode, message: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, key: &str, value: impl Into<String>) -> Result<T> {
        self.map_err(|error| error.with_metadata(key, value))
    }

    fn or_expected(self, code: ErrorCode, message: impl Into<String>) -> Result<T> {
        self.map_err(|error| {
            let cause = error.message;
            let mut replaced = ErrorEnvelope::expected(code, message);
            replaced.metadata = error.metadata;
            replaced.with_metadata("cause", cause)
        })
    }
}
