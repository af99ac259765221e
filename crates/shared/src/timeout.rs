//! Bounded waits tagged with the owning session.

use crate::{ErrorClass, ErrorCode, ErrorEnvelope, Result, SessionContext};
use std::future::Future;
use std::time::Duration;

/// Run `fut` with an upper bound on its duration.
///
/// Resolves to a `core:timeout` error carrying the operation and session id
/// when the bound elapses.
pub async fn timeout_with_context<T, F>(
    ctx: &SessionContext,
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(timeout, fut).await.unwrap_or_else(|_| {
        Err(timeout_error(operation, timeout)
            .with_metadata("sessionId", ctx.session_id().as_str()))
    })
}

/// Returns true when `error` was produced by an elapsed bound.
#[must_use]
pub fn is_timeout(error: &ErrorEnvelope) -> bool {
    error.code == ErrorCode::timeout()
}

fn timeout_error(operation: &'static str, timeout: Duration) -> ErrorEnvelope {
    ErrorEnvelope::unexpected(
        ErrorCode::timeout(),
        format!("{operation} timed out after {}ms", timeout.as_millis()),
        ErrorClass::Retriable,
    )
    .with_metadata("operation", operation)
}
