//! Secret detection and redaction utilities.
//!
//! Provides consistent logic for detecting sensitive keys and for masking
//! secret values before they reach a terminal or a log line.

use std::fmt;

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Number of leading and trailing characters left visible by [`mask_secret`].
pub const MASK_VISIBLE_CHARS: usize = 4;

const MASK_FILL: &str = "****";

/// Checks if a key/variable name likely refers to a secret.
///
/// Uses case-insensitive pattern matching to detect common secret-related
/// naming conventions.
///
/// # Examples
///
/// ```
/// use azure_setup_shared::is_secret_key;
///
/// assert!(is_secret_key("apiKey"));
/// assert!(is_secret_key("AZURE_OPENAI_TOKEN"));
/// assert!(!is_secret_key("baseURL"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    ["KEY", "TOKEN", "SECRET", "PASSWORD", "CREDENTIAL", "AUTH"]
        .iter()
        .any(|marker| key.contains(marker))
}

/// Masks a secret so only a short prefix and suffix remain visible.
///
/// The visible characters never exceed half of the secret; shorter values
/// are fully masked.
///
/// # Examples
///
/// ```
/// use azure_setup_shared::mask_secret;
///
/// assert_eq!(mask_secret("0123456789abcdef"), "0123****cdef");
/// assert_eq!(mask_secret("0123456789abcde"), "****");
/// ```
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count < MASK_VISIBLE_CHARS * 4 {
        return MASK_FILL.to_string();
    }

    let prefix: String = secret.chars().take(MASK_VISIBLE_CHARS).collect();
    let suffix: String = secret.chars().skip(count - MASK_VISIBLE_CHARS).collect();
    format!("{prefix}{MASK_FILL}{suffix}")
}

/// A secret string wrapper that redacts on Display/Debug.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretString(Box<str>);

impl SecretString {
    /// Wrap a secret value.
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self(value.into())
    }

    /// Borrow the underlying secret.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Consume and return the underlying secret.
    pub fn into_inner(self) -> Box<str> {
        self.0
    }

    /// Returns a prefix/suffix masked rendering safe for display.
    #[must_use]
    pub fn masked(&self) -> String {
        mask_secret(&self.0)
    }

    /// Returns true when the secret is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self(Box::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn detects_common_secret_patterns() {
        assert!(is_secret_key("API_KEY"));
        assert!(is_secret_key("apiKey"));
        assert!(is_secret_key("refresh_token"));
        assert!(is_secret_key("CLIENT_SECRET"));
        assert!(is_secret_key("db_password"));
        assert!(is_secret_key("credentials"));
        assert!(is_secret_key("basic_auth"));
    }

    #[test]
    fn rejects_non_secret_patterns() {
        assert!(!is_secret_key("baseURL"));
        assert!(!is_secret_key("apiVersion"));
        assert!(!is_secret_key("deployment"));
        assert!(!is_secret_key("TIMEOUT_MS"));
    }

    #[test]
    fn masks_long_secrets_with_prefix_and_suffix() {
        assert_eq!(mask_secret("abcdefghijklmnop"), "abcd****mnop");
        assert_eq!(mask_secret("sk-0123456789abcdef"), "sk-0****cdef");
    }

    #[test]
    fn masks_short_secrets_completely() {
        assert_eq!(mask_secret(""), "****");
        assert_eq!(mask_secret("12345678"), "****");
        assert_eq!(mask_secret("123456789"), "****");
        assert_eq!(mask_secret("abcdefghijklmno"), "****");
    }

    #[test]
    fn masking_respects_char_boundaries() {
        assert_eq!(mask_secret("ééééxxxxxxxxüüüü"), "éééé****üüüü");
    }

    #[test]
    fn secret_string_redacts_display_and_debug() {
        let secret = SecretString::new("shh-very-secret!");
        assert_eq!(secret.to_string(), REDACTED);
        assert_eq!(format!("{secret:?}"), REDACTED);
        assert_eq!(secret.masked(), "shh-****ret!");
    }

    proptest! {
        #[test]
        fn masked_output_never_reveals_the_middle(secret in "[a-zA-Z0-9]{16,64}") {
            let masked = mask_secret(&secret);
            let middle = &secret[MASK_VISIBLE_CHARS..secret.len() - MASK_VISIBLE_CHARS];
            prop_assert_eq!(masked.len(), MASK_VISIBLE_CHARS * 2 + MASK_FILL.len());
            if middle.len() > MASK_FILL.len() {
                prop_assert!(!masked.contains(middle));
            }
        }

        #[test]
        fn visible_characters_never_exceed_half(secret in "[a-zA-Z0-9]{0,40}") {
            let masked = mask_secret(&secret);
            let visible = masked.len() - MASK_FILL.len();
            prop_assert!(visible * 2 <= secret.len());
        }
    }
}
