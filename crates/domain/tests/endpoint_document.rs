//! Integration tests for parsed endpoints flowing into the config document.

use azure_setup_domain::{
    ConfigDocument, Credential, EndpointDefaults, PROVIDER_NAME, parse_endpoint,
};
use azure_setup_shared::{ErrorCode, ErrorEnvelope};
use serde_json::{Value, json};

#[test]
fn portal_url_round_trips_through_document() -> Result<(), ErrorEnvelope> {
    let endpoint = parse_endpoint(
        "https://foo.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-10-21",
        &EndpointDefaults::builtin(),
    )?;
    let credential = Credential::new("sk-test-0123456789")?; // pragma: allowlist secret

    let mut document = ConfigDocument::from_value(json!({
        "theme": "dark",
        "provider": { "local": { "npm": "local-provider" } }
    }))
    .ok_or_else(|| ErrorEnvelope::invariant(ErrorCode::internal(), "not an object"))?;
    document.merge(&endpoint, &credential);

    let settings = document
        .provider_settings()
        .ok_or_else(|| ErrorEnvelope::invariant(ErrorCode::internal(), "provider entry missing"))?;
    assert_eq!(
        settings.base_url.as_deref(),
        Some("https://foo.openai.azure.com/openai")
    );
    assert_eq!(settings.deployment.as_deref(), Some("gpt-4o"));
    assert_eq!(settings.api_version.as_deref(), Some("2024-10-21"));
    assert_eq!(
        settings.credential().map(|credential| credential.expose().to_owned()),
        Some("sk-test-0123456789".to_owned()) // pragma: allowlist secret
    );

    let root = document.into_value();
    assert_eq!(root.get("theme"), Some(&Value::from("dark")));
    assert_eq!(root["provider"]["local"]["npm"], Value::from("local-provider"));
    assert_eq!(root["model"], Value::from(format!("{PROVIDER_NAME}/gpt-4o")));
    assert_eq!(
        root["provider"][PROVIDER_NAME]["options"]["useDeploymentBasedUrls"],
        Value::Bool(true)
    );
    Ok(())
}

#[test]
fn bare_host_uses_defaults_and_builds_request_url() -> Result<(), ErrorEnvelope> {
    let defaults = EndpointDefaults::new("gpt-5", "2025-04-01-preview");
    let endpoint = parse_endpoint("foo.openai.azure.com", &defaults)?;

    assert_eq!(endpoint.base_url(), "https://foo.openai.azure.com/openai");
    let url = endpoint.chat_completions_url()?;
    assert_eq!(
        url.as_str(),
        "https://foo.openai.azure.com/openai/deployments/gpt-5/chat/completions?api-version=2025-04-01-preview"
    );
    Ok(())
}

#[test]
fn merging_twice_is_stable() -> Result<(), ErrorEnvelope> {
    let endpoint = parse_endpoint("https://bar.openai.azure.com", &EndpointDefaults::builtin())?;
    let credential = Credential::new("key-abcdefghijkl")?; // pragma: allowlist secret

    let mut once = ConfigDocument::empty();
    once.merge(&endpoint, &credential);
    let mut twice = once.clone();
    twice.merge(&endpoint, &credential);

    assert_eq!(once, twice);
    Ok(())
}
