//! Canonical Azure OpenAI endpoint descriptors and the endpoint parser.
//!
//! Users paste anything from a bare resource host to a full portal URL with
//! the deployment and `api-version` embedded. [`parse_endpoint`] reduces all
//! of those to the same triple: an API root ending in `/openai`, a
//! deployment name, and an API version.

use azure_setup_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Path segment that terminates every canonical base URL.
pub const ROOT_SEGMENT: &str = "openai";

/// Deployment used when neither input nor any defaults source names one.
pub const BUILTIN_DEPLOYMENT: &str = "gpt-5";

/// API version used when neither input nor any defaults source names one.
pub const BUILTIN_API_VERSION: &str = "2025-04-01-preview";

const DEPLOYMENTS_SEGMENT: &str = "deployments";
const API_VERSION_PARAM: &str = "api-version";
const SECURE_SCHEME_PREFIX: &str = "https://";

/// Failures while building an endpoint descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Raw endpoint input is empty after trimming.
    EmptyInput,
    /// No deployment could be derived and the defaults were empty.
    EmptyDeployment,
    /// No API version could be derived and the defaults were empty.
    EmptyApiVersion,
    /// The stored base URL cannot be turned into a request URL.
    UnusableBaseUrl {
        /// Base URL that failed to parse.
        base_url: String,
    },
}

impl EndpointError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyInput => ErrorCode::setup("missing_endpoint"),
            Self::EmptyDeployment | Self::EmptyApiVersion | Self::UnusableBaseUrl { .. } => {
                ErrorCode::setup("invalid_endpoint")
            },
        }
    }
}

impl fmt::Display for EndpointError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => formatter.write_str("an Azure OpenAI endpoint is required"),
            Self::EmptyDeployment => formatter.write_str("a deployment name is required"),
            Self::EmptyApiVersion => formatter.write_str("an API version is required"),
            Self::UnusableBaseUrl { base_url } => {
                write!(formatter, "base URL is not a valid http(s) URL: {base_url}")
            },
        }
    }
}

impl std::error::Error for EndpointError {}

impl From<EndpointError> for ErrorEnvelope {
    fn from(error: EndpointError) -> Self {
        let envelope = Self::expected(error.error_code(), error.to_string());
        match error {
            EndpointError::UnusableBaseUrl { base_url } => {
                envelope.with_metadata("base_url", base_url)
            },
            EndpointError::EmptyInput
            | EndpointError::EmptyDeployment
            | EndpointError::EmptyApiVersion => envelope,
        }
    }
}

/// Fallback deployment and API version used when input does not carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefaults {
    /// Fallback deployment name.
    pub deployment: Box<str>,
    /// Fallback API version.
    pub api_version: Box<str>,
}

impl EndpointDefaults {
    /// Build defaults from explicit values.
    pub fn new(deployment: impl Into<Box<str>>, api_version: impl Into<Box<str>>) -> Self {
        Self {
            deployment: deployment.into(),
            api_version: api_version.into(),
        }
    }

    /// The compiled-in defaults.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_DEPLOYMENT, BUILTIN_API_VERSION)
    }

    /// Replace each field with its override when the override is non-blank.
    #[must_use]
    pub fn overridden_by(self, deployment: Option<&str>, api_version: Option<&str>) -> Self {
        Self {
            deployment: non_blank(deployment).map_or(self.deployment, Box::from),
            api_version: non_blank(api_version).map_or(self.api_version, Box::from),
        }
    }
}

impl Default for EndpointDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Canonical `(base URL, deployment, API version)` triple.
///
/// The base URL never carries the deployment or the `api-version` query; both
/// are held separately and re-attached by [`EndpointDescriptor::chat_completions_url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
    base_url: Box<str>,
    deployment: Box<str>,
    api_version: Box<str>,
}

impl EndpointDescriptor {
    /// Assemble a descriptor from already-canonical parts without re-parsing.
    ///
    /// Used for values read back from a stored config, which the user may
    /// have customized by hand.
    pub fn from_parts(
        base_url: &str,
        deployment: &str,
        api_version: &str,
    ) -> Result<Self, EndpointError> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(EndpointError::EmptyInput);
        }
        let deployment = non_blank(Some(deployment)).ok_or(EndpointError::EmptyDeployment)?;
        let api_version = non_blank(Some(api_version)).ok_or(EndpointError::EmptyApiVersion)?;

        Ok(Self {
            base_url: base_url.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
        })
    }

    /// API root, e.g. `https://foo.openai.azure.com/openai`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Deployment name.
    #[must_use]
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// API version token.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Return a copy with a different deployment and API version.
    pub fn with_deployment(
        &self,
        deployment: &str,
        api_version: &str,
    ) -> Result<Self, EndpointError> {
        Self::from_parts(&self.base_url, deployment, api_version)
    }

    /// Request URL for the chat completions route of this deployment.
    pub fn chat_completions_url(&self) -> Result<Url, EndpointError> {
        let unusable = || EndpointError::UnusableBaseUrl {
            base_url: self.base_url.to_string(),
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| unusable())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(unusable());
        }
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| unusable())?
            .pop_if_empty()
            .extend([DEPLOYMENTS_SEGMENT, &*self.deployment, "chat", "completions"]);
        url.query_pairs_mut()
            .append_pair(API_VERSION_PARAM, &self.api_version);
        Ok(url)
    }
}

impl fmt::Display for EndpointDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{DEPLOYMENTS_SEGMENT}/{}?{API_VERSION_PARAM}={}",
            self.base_url, self.deployment, self.api_version
        )
    }
}

/// Parse raw endpoint input into a canonical descriptor.
///
/// Accepts full portal URLs, partial URLs, and bare hosts. A deployment
/// found after a `deployments` path segment and an `api-version` query value
/// override `defaults`; anything missing falls back to `defaults`.
pub fn parse_endpoint(
    raw: &str,
    defaults: &EndpointDefaults,
) -> Result<EndpointDescriptor, EndpointError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EndpointError::EmptyInput);
    }

    let parsed = parse_http_url(trimmed).or_else(|| {
        if trimmed.contains("://") {
            None
        } else {
            parse_http_url(&format!("{SECURE_SCHEME_PREFIX}{trimmed}"))
        }
    });

    let (base_url, deployment, api_version) = match parsed {
        Some(url) => split_portal_url(url),
        None => (literal_base_url(trimmed), None, None),
    };

    EndpointDescriptor::from_parts(
        &base_url,
        deployment.as_deref().unwrap_or(&defaults.deployment),
        api_version.as_deref().unwrap_or(&defaults.api_version),
    )
}

fn parse_http_url(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;
    let has_host = url.host_str().is_some_and(|host| !host.is_empty());
    (matches!(url.scheme(), "http" | "https") && has_host).then_some(url)
}

fn split_portal_url(mut url: Url) -> (String, Option<String>, Option<String>) {
    let segments: Vec<String> = url
        .path_segments()
        .map(|segments| segments.map(str::to_owned).collect())
        .unwrap_or_default();

    let deployment = segments
        .iter()
        .position(|segment| segment.eq_ignore_ascii_case(DEPLOYMENTS_SEGMENT))
        .and_then(|index| segments.get(index + 1))
        .and_then(|segment| non_blank(Some(segment.as_str())).map(str::to_owned));

    let api_version = url
        .query_pairs()
        .find(|(key, _)| key == API_VERSION_PARAM)
        .and_then(|(_, value)| non_blank(Some(&*value)).map(str::to_owned));

    let root_path = match segments
        .iter()
        .position(|segment| segment.eq_ignore_ascii_case(ROOT_SEGMENT))
    {
        Some(index) => format!(
            "/{}",
            segments
                .get(..=index)
                .map(|root| root.join("/"))
                .unwrap_or_default()
        ),
        None => format!("/{ROOT_SEGMENT}"),
    };

    url.set_path(&root_path);
    url.set_query(None);
    url.set_fragment(None);
    let base_url = url.as_str().trim_end_matches('/').to_owned();

    (base_url, deployment, api_version)
}

// Last resort for text the URL parser rejects outright.
fn literal_base_url(trimmed: &str) -> String {
    let stripped = trimmed.trim_end_matches('/');
    let mut base = if stripped.contains("://") {
        stripped.to_owned()
    } else {
        format!("{SECURE_SCHEME_PREFIX}{stripped}")
    };
    if !base.ends_with(&format!("/{ROOT_SEGMENT}")) {
        base.push('/');
        base.push_str(ROOT_SEGMENT);
    }
    base
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
