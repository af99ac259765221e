//! Connectivity probe outcomes.

use serde::Serialize;
use std::fmt;

/// Maximum characters of a response body kept for display.
pub const PROBE_BODY_DISPLAY_LIMIT: usize = 512;

/// Why a probe did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailure {
    /// The service answered with a non-200 status.
    HttpStatus,
    /// The bounded wait elapsed.
    Timeout,
    /// Connection, TLS, or request construction failed.
    Transport,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HttpStatus => "unexpected status",
            Self::Timeout => "timed out",
            Self::Transport => "connection failed",
        };
        formatter.write_str(label)
    }
}

/// Classified outcome of one probe request.
///
/// `status_code` is `None` when no HTTP response was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    ok: bool,
    status_code: Option<u16>,
    failure: Option<ProbeFailure>,
    body: String,
}

impl ProbeResult {
    /// Classify an HTTP response. Only 200 counts as success.
    pub fn from_status(status_code: u16, body: impl Into<String>) -> Self {
        let ok = status_code == 200;
        Self {
            ok,
            status_code: Some(status_code),
            failure: (!ok).then_some(ProbeFailure::HttpStatus),
            body: body.into(),
        }
    }

    /// The bounded wait elapsed before a response arrived.
    pub fn timed_out(detail: impl Into<String>) -> Self {
        Self::without_response(ProbeFailure::Timeout, detail)
    }

    /// The request never produced an HTTP response.
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::without_response(ProbeFailure::Transport, detail)
    }

    fn without_response(failure: ProbeFailure, detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            status_code: None,
            failure: Some(failure),
            body: detail.into(),
        }
    }

    /// True for a 200 response.
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.ok
    }

    /// HTTP status, or `None` for transport failures and timeouts.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Failure reason when the probe did not pass.
    #[must_use]
    pub const fn failure(&self) -> Option<ProbeFailure> {
        self.failure
    }

    /// Raw response body or error description.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body truncated to [`PROBE_BODY_DISPLAY_LIMIT`] characters.
    #[must_use]
    pub fn display_body(&self) -> String {
        truncate_for_display(&self.body, PROBE_BODY_DISPLAY_LIMIT)
    }

    /// One-line diagnostic summary.
    #[must_use]
    pub fn summary(&self) -> String {
        match (self.ok, self.status_code, self.failure) {
            (true, _, _) => "connection verified (HTTP 200)".to_string(),
            (false, Some(status), _) => format!("endpoint answered HTTP {status}"),
            (false, None, Some(failure)) => format!("probe {failure}"),
            (false, None, None) => "probe failed".to_string(),
        }
    }
}

fn truncate_for_display(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}…", text.get(..cut).unwrap_or(text)),
        None => text.to_string(),
    }
}
