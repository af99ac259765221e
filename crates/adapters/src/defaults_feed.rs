//! Remote defaults feed over HTTP.

use azure_setup_ports::{BoxFuture, DefaultsSourcePort, PublishedDefaults};
use azure_setup_shared::{
    ErrorClass, ErrorCode, ErrorEnvelope, Result, SessionContext, timeout_with_context,
};
use serde::Deserialize;
use std::time::Duration;

/// Defaults feed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpDefaultsFeedConfig {
    /// Feed document URL.
    pub url: Box<str>,
    /// Upper bound for the fetch.
    pub timeout: Duration,
}

/// Fetches suggested deployment and API version from a JSON document.
pub struct HttpDefaultsFeed {
    client: reqwest::Client,
    url: Box<str>,
    timeout: Duration,
}

impl HttpDefaultsFeed {
    /// Create a feed client.
    pub fn new(config: HttpDefaultsFeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                ErrorEnvelope::unexpected(
                    ErrorCode::new("defaults", "client_init_failed"),
                    format!("failed to build HTTP client: {error}"),
                    ErrorClass::NonRetriable,
                )
            })?;
        Ok(Self {
            client,
            url: config.url,
            timeout: config.timeout,
        })
    }

    async fn fetch_document(&self, ctx: &SessionContext) -> Result<FeedDocument> {
        timeout_with_context(ctx, self.timeout, "defaults.fetch", async {
            let response = self
                .client
                .get(&*self.url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|error| feed_error(&error))?;
            response
                .json::<FeedDocument>()
                .await
                .map_err(|error| feed_error(&error))
        })
        .await
    }
}

impl DefaultsSourcePort for HttpDefaultsFeed {
    fn fetch<'a>(&'a self, ctx: &'a SessionContext) -> BoxFuture<'a, Option<PublishedDefaults>> {
        Box::pin(async move {
            match self.fetch_document(ctx).await {
                Ok(document) => Some(document.into_published()),
                Err(error) => {
                    tracing::debug!(url = %self.url, %error, "defaults feed unavailable");
                    None
                },
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct FeedDocument {
    deployment: Option<String>,
    #[serde(rename = "apiVersion", alias = "api_version")]
    api_version: Option<String>,
}

impl FeedDocument {
    fn into_published(self) -> PublishedDefaults {
        let clean = |value: Option<String>| {
            value
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .map(String::into_boxed_str)
        };
        PublishedDefaults {
            deployment: clean(self.deployment),
            api_version: clean(self.api_version),
        }
    }
}

fn feed_error(error: &reqwest::Error) -> ErrorEnvelope {
    let code = if error.is_timeout() {
        ErrorCode::timeout()
    } else {
        ErrorCode::new("defaults", "fetch_failed")
    };
    ErrorEnvelope::unexpected(code, error.to_string(), ErrorClass::Retriable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_feed_values_are_dropped() -> std::result::Result<(), serde_json::Error> {
        let document: FeedDocument =
            serde_json::from_str(r#"{ "deployment": "  ", "api_version": "2025-01-01" }"#)?;
        let published = document.into_published();

        assert_eq!(published.deployment, None);
        assert_eq!(published.api_version.as_deref(), Some("2025-01-01"));
        Ok(())
    }
}
