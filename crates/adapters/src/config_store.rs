//! File-backed assistant config store.

use azure_setup_config::{DecodedDocument, decode_document, encode_document};
use azure_setup_domain::ConfigDocument;
use azure_setup_ports::{ConfigStorePort, DocumentOrigin, LoadedDocument};
use azure_setup_shared::{ErrorCode, ErrorEnvelope, Result, ResultExt};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of the copy kept when an unreadable file is overwritten.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Reads and writes the assistant config as pretty JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backup written before overwriting a malformed file.
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        sibling_with_suffix(&self.path, BACKUP_SUFFIX)
    }

    fn back_up_if_malformed(&self) -> Result<()> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
            // Unreadable as text; keep the raw bytes instead.
            Err(_) => return self.copy_to_backup(),
        };
        match decode_document(&text) {
            DecodedDocument::Parsed(_) => Ok(()),
            DecodedDocument::Malformed { .. } if text.trim().is_empty() => Ok(()),
            DecodedDocument::Malformed { .. } => self.copy_to_backup(),
        }
    }

    fn copy_to_backup(&self) -> Result<()> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup)
            .map(|_| ())
            .map_err(ErrorEnvelope::from)
            .with_context("path", backup.display().to_string())
    }
}

impl ConfigStorePort for FileConfigStore {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> LoadedDocument {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return loaded(ConfigDocument::empty(), DocumentOrigin::Missing);
            },
            Err(_) => return loaded(ConfigDocument::empty(), DocumentOrigin::Unreadable),
        };

        match decode_document(&text) {
            DecodedDocument::Parsed(document) => loaded(document, DocumentOrigin::Parsed),
            DecodedDocument::Malformed { .. } => {
                loaded(ConfigDocument::empty(), DocumentOrigin::Malformed)
            },
        }
    }

    fn persist(&self, document: &ConfigDocument) -> Result<PathBuf> {
        let encoded = encode_document(document)?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(ErrorEnvelope::from)
                .or_expected(
                    ErrorCode::io(),
                    format!("cannot create config directory {}", parent.display()),
                )?;
        }
        self.back_up_if_malformed()?;

        let staging = sibling_with_suffix(&self.path, &format!(".tmp-{}", std::process::id()));
        let written = fs::write(&staging, encoded).and_then(|()| fs::rename(&staging, &self.path));
        if written.is_err() {
            let _ = fs::remove_file(&staging);
        }
        written.map_err(ErrorEnvelope::from).or_expected(
            ErrorCode::io(),
            format!("cannot write config file {}", self.path.display()),
        )?;

        Ok(self.path.clone())
    }
}

const fn loaded(document: ConfigDocument, origin: DocumentOrigin) -> LoadedDocument {
    LoadedDocument { document, origin }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
