//! HTTP adapter integration tests against a mock Azure endpoint.

use azure_setup_adapters::{
    AzureChatProbe, AzureChatProbeConfig, HttpDefaultsFeed, HttpDefaultsFeedConfig,
};
use azure_setup_domain::{Credential, EndpointDescriptor, ProbeFailure};
use azure_setup_ports::{DefaultsSourcePort, ProbePort};
use azure_setup_shared::{Result, SessionContext};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEPLOYMENT_PATH: &str = "/openai/deployments/gpt-5/chat/completions";

fn endpoint(server: &MockServer) -> Result<EndpointDescriptor> {
    Ok(EndpointDescriptor::from_parts(
        &format!("{}/openai", server.uri()),
        "gpt-5",
        "2025-04-01-preview",
    )?)
}

fn probe(timeout: Duration) -> Result<AzureChatProbe> {
    AzureChatProbe::new(AzureChatProbeConfig { timeout })
}

#[tokio::test]
async fn probe_sends_minimal_chat_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DEPLOYMENT_PATH))
        .and(query_param("api-version", "2025-04-01-preview"))
        .and(header("api-key", "example-key"))
        .and(body_json(json!({
            "messages": [ { "role": "user", "content": "ping" } ],
            "max_completion_tokens": 16
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = SessionContext::start();
    let credential = Credential::new("example-key")?; // pragma: allowlist secret
    let result = probe(Duration::from_secs(5))?
        .probe(&ctx, &endpoint(&server)?, &credential)
        .await;

    assert!(result.ok());
    assert_eq!(result.status_code(), Some(200));
    assert_eq!(result.failure(), None);
    Ok(())
}

#[tokio::test]
async fn probe_captures_rejection_body() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DEPLOYMENT_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("{\"error\":{\"code\":\"401\"}}"),
        )
        .mount(&server)
        .await;

    let ctx = SessionContext::start();
    let credential = Credential::new("wrong-key")?; // pragma: allowlist secret
    let result = probe(Duration::from_secs(5))?
        .probe(&ctx, &endpoint(&server)?, &credential)
        .await;

    assert!(!result.ok());
    assert_eq!(result.status_code(), Some(401));
    assert_eq!(result.failure(), Some(ProbeFailure::HttpStatus));
    assert!(result.body().contains("\"401\""));
    Ok(())
}

#[tokio::test]
async fn non_200_success_is_still_a_failure() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let ctx = SessionContext::start();
    let credential = Credential::new("example-key")?; // pragma: allowlist secret
    let result = probe(Duration::from_secs(5))?
        .probe(&ctx, &endpoint(&server)?, &credential)
        .await;

    assert!(!result.ok());
    assert_eq!(result.status_code(), Some(204));
    Ok(())
}

#[tokio::test]
async fn slow_endpoint_times_out() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let ctx = SessionContext::start();
    let credential = Credential::new("example-key")?; // pragma: allowlist secret
    let result = probe(Duration::from_millis(200))?
        .probe(&ctx, &endpoint(&server)?, &credential)
        .await;

    assert!(!result.ok());
    assert_eq!(result.status_code(), None);
    assert_eq!(result.failure(), Some(ProbeFailure::Timeout));
    Ok(())
}

#[tokio::test]
async fn defaults_feed_overrides_present_fields() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/defaults.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deployment": "gpt-5-mini",
            "apiVersion": ""
        })))
        .mount(&server)
        .await;

    let feed = HttpDefaultsFeed::new(HttpDefaultsFeedConfig {
        url: format!("{}/defaults.json", server.uri()).into(),
        timeout: Duration::from_secs(2),
    })?;
    let published = feed.fetch(&SessionContext::start()).await;

    let published = published.ok_or("feed returned nothing")?;
    assert_eq!(published.deployment.as_deref(), Some("gpt-5-mini"));
    assert_eq!(published.api_version, None);
    Ok(())
}

#[tokio::test]
async fn unavailable_defaults_feed_yields_none() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let feed = HttpDefaultsFeed::new(HttpDefaultsFeedConfig {
        url: format!("{}/defaults.json", server.uri()).into(),
        timeout: Duration::from_secs(2),
    })?;

    assert_eq!(feed.fetch(&SessionContext::start()).await, None);
    Ok(())
}

#[derive(Clone, Default)]
struct Capture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Capture {
    fn contents(&self) -> String {
        self.buffer
            .lock()
            .map(|guard| String::from_utf8_lossy(&guard).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for Capture {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Ok(mut guard) = self.buffer.lock() {
            guard.extend_from_slice(bytes);
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn unavailable_defaults_feed_is_logged_at_debug() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let feed = HttpDefaultsFeed::new(HttpDefaultsFeedConfig {
        url: format!("{}/defaults.json", server.uri()).into(),
        timeout: Duration::from_secs(2),
    })?;

    let writer = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let published = {
        let _guard = tracing::subscriber::set_default(subscriber);
        feed.fetch(&SessionContext::start()).await
    };

    assert_eq!(published, None);
    let output = writer.contents();
    assert!(output.contains("defaults feed unavailable"));
    assert!(output.contains("defaults:fetch_failed"));
    Ok(())
}
