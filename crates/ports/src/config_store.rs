//! Configuration store boundary contract.

use azure_setup_domain::ConfigDocument;
use azure_setup_shared::Result;
use std::path::{Path, PathBuf};

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// No file existed.
    Missing,
    /// The file parsed as a JSON object.
    Parsed,
    /// The file existed but was not a JSON object.
    Malformed,
    /// The file existed but could not be read.
    Unreadable,
}

impl DocumentOrigin {
    /// True when an existing file could not be used.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Malformed | Self::Unreadable)
    }
}

/// A document plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// Document contents; empty unless `origin` is `Parsed`.
    pub document: ConfigDocument,
    /// How the document was obtained.
    pub origin: DocumentOrigin,
}

/// Boundary contract for the persisted assistant configuration.
pub trait ConfigStorePort: Send + Sync {
    /// Path of the backing file.
    fn location(&self) -> &Path;

    /// Load the document. Never fails: unusable files load as empty.
    fn load(&self) -> LoadedDocument;

    /// Overwrite the backing file with `document`.
    fn persist(&self, document: &ConfigDocument) -> Result<PathBuf>;
}
