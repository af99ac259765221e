//! Azure OpenAI connectivity probe.
//!
//! Sends the smallest chat completion that still exercises the deployment,
//! credential, and API version together.

use azure_setup_domain::{Credential, EndpointDescriptor, ProbeResult};
use azure_setup_ports::{BoxFuture, ProbePort};
use azure_setup_shared::{
    ErrorClass, ErrorCode, ErrorEnvelope, Result, SessionContext, is_timeout,
    timeout_with_context,
};
use reqwest::header::HeaderValue;
use serde::Serialize;
use std::time::Duration;

/// Header carrying the resource key.
pub const API_KEY_HEADER: &str = "api-key";

const PROBE_PROMPT: &str = "ping";
const PROBE_MAX_COMPLETION_TOKENS: u32 = 16;

/// Probe adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AzureChatProbeConfig {
    /// Upper bound for the whole request, including reading the body.
    pub timeout: Duration,
}

/// Probe that issues one chat completion request.
pub struct AzureChatProbe {
    client: reqwest::Client,
    timeout: Duration,
}

impl AzureChatProbe {
    /// Create a probe with a bounded HTTP client.
    pub fn new(config: AzureChatProbeConfig) -> Result<Self> {
        if config.timeout.is_zero() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::invalid_input(),
                "probe timeout must be greater than zero",
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::new("probe", "client_init_failed"),
                    format!("failed to build HTTP client: {error}"),
                    ErrorClass::NonRetriable,
                )
            })?;

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    async fn run(
        &self,
        ctx: &SessionContext,
        endpoint: &EndpointDescriptor,
        credential: &Credential,
    ) -> ProbeResult {
        let url = match endpoint.chat_completions_url() {
            Ok(url) => url,
            Err(error) => return ProbeResult::transport(error.to_string()),
        };
        let Ok(mut api_key) = HeaderValue::from_str(credential.expose()) else {
            return ProbeResult::transport("api key contains invalid header characters");
        };
        api_key.set_sensitive(true);

        let request = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&ProbeRequest::minimal());

        let outcome = timeout_with_context(ctx, self.timeout, "probe.chat_completions", async {
            let response = request
                .send()
                .await
                .map_err(|error| map_reqwest_error(&error))?;
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Ok(ProbeResult::from_status(status, body))
        })
        .await;

        match outcome {
            Ok(result) => result,
            Err(error) if is_timeout(&error) => ProbeResult::timed_out(error.message),
            Err(error) => ProbeResult::transport(error.message),
        }
    }
}

impl ProbePort for AzureChatProbe {
    fn probe<'a>(
        &'a self,
        ctx: &'a SessionContext,
        endpoint: &'a EndpointDescriptor,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProbeResult> {
        Box::pin(self.run(ctx, endpoint, credential))
    }
}

#[derive(Debug, Serialize)]
struct ProbeRequest {
    messages: [ProbeMessage; 1],
    max_completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ProbeMessage {
    role: &'static str,
    content: &'static str,
}

impl ProbeRequest {
    const fn minimal() -> Self {
        Self {
            messages: [ProbeMessage {
                role: "user",
                content: PROBE_PROMPT,
            }],
            max_completion_tokens: PROBE_MAX_COMPLETION_TOKENS,
        }
    }
}

fn map_reqwest_error(error: &reqwest::Error) -> ErrorEnvelope {
    if error.is_timeout() {
        return ErrorEnvelope::unexpected(
            ErrorCode::timeout(),
            "probe request timed out",
            ErrorClass::Retriable,
        );
    }
    if error.is_connect() {
        return ErrorEnvelope::unexpected(
            ErrorCode::io(),
            format!("connection failed: {error}"),
            ErrorClass::Retriable,
        );
    }
    ErrorEnvelope::unexpected(
        ErrorCode::new("probe", "request_failed"),
        format!("request failed: {error}"),
        ErrorClass::NonRetriable,
    )
}
