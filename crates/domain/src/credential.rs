//! API key credential.

use azure_setup_shared::{ErrorCode, ErrorEnvelope, SecretString};

/// Opaque API key for the Azure resource.
///
/// Only [`Credential::redacted`] output may be shown to users or logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: SecretString,
}

impl Credential {
    /// Wrap a non-blank API key. Surrounding whitespace is removed.
    pub fn new(api_key: &str) -> Result<Self, ErrorEnvelope> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return Err(ErrorEnvelope::expected(
                ErrorCode::setup("missing_credential"),
                "an API key is required",
            ));
        }
        Ok(Self {
            api_key: SecretString::new(trimmed),
        })
    }

    /// Borrow the raw key for request headers and persistence.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.api_key.expose()
    }

    /// Prefix/suffix rendering with the middle masked.
    #[must_use]
    pub fn redacted(&self) -> String {
        self.api_key.masked()
    }
}

impl From<SecretString> for Credential {
    fn from(api_key: SecretString) -> Self {
        Self { api_key }
    }
}
