//! Interactive prompt boundary contract.
//!
//! The setup flow asks questions through this port only, so it can run
//! against a terminal or against scripted answers in tests.

use azure_setup_shared::Result;

/// Severity of a message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral progress information.
    Info,
    /// A step completed.
    Success,
    /// Recoverable problem; the flow continues.
    Warning,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Display text (already redacted).
    pub message: Box<str>,
}

impl Notice {
    /// Build an info notice.
    pub fn info(message: impl Into<Box<str>>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Build a success notice.
    pub fn success(message: impl Into<Box<str>>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Build a warning notice.
    pub fn warning(message: impl Into<Box<str>>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Boundary contract for asking the user questions.
///
/// Every method returns `core:cancelled` when the user interrupts input.
pub trait PromptPort: Send + Sync {
    /// Ask for free text. Blank input yields `default` when one is given.
    fn ask_text(&self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask for a secret without echoing it.
    ///
    /// `existing_redacted` is a masked hint of the stored value; blank input
    /// returns an empty string so the caller can decide whether to keep it.
    fn ask_secret(&self, prompt: &str, existing_redacted: Option<&str>) -> Result<String>;

    /// Ask a yes/no question.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Show a message.
    fn show(&self, notice: &Notice);
}
