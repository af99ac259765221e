//! Session-scoped context passed explicitly through the setup flow.
//!
//! A setup run owns exactly one `SessionContext`. Adapters receive it by
//! reference and tag their bounded waits with its id.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier attached to every log event of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// Allocate the next process-unique session id (`ses_<n>`).
    #[must_use]
    pub fn next() -> Self {
        let n = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(Arc::from(format!("ses_{n}")))
    }

    /// Borrow the identifier as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Context owned by a single setup session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session_id: SessionId,
}

impl SessionContext {
    /// Start a new session with a fresh id.
    #[must_use]
    pub fn start() -> Self {
        Self {
            session_id: SessionId::next(),
        }
    }

    /// Return the session id.
    #[must_use]
    pub const fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}
