//! Remote defaults boundary contract.

use crate::BoxFuture;
use azure_setup_shared::SessionContext;

/// Defaults published by a remote feed. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedDefaults {
    /// Suggested deployment name.
    pub deployment: Option<Box<str>>,
    /// Suggested API version.
    pub api_version: Option<Box<str>>,
}

/// Boundary contract for fetching suggested defaults.
pub trait DefaultsSourcePort: Send + Sync {
    /// Fetch defaults. Any failure resolves to `None`.
    fn fetch<'a>(&'a self, ctx: &'a SessionContext) -> BoxFuture<'a, Option<PublishedDefaults>>;
}
