//! Terminal prompter built on `dialoguer`.
//!
//! Prompts render on stderr so stdout stays free for the summary.

use azure_setup_ports::{Notice, NoticeLevel, PromptPort};
use azure_setup_shared::{ErrorEnvelope, Result};
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};
use std::io;

/// Interactive prompter bound to the process terminal.
pub struct TerminalPrompter {
    term: Term,
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    /// Prompter writing to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::stderr()
    }
}

impl std::fmt::Debug for TerminalPrompter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalPrompter").finish_non_exhaustive()
    }
}

impl PromptPort for TerminalPrompter {
    fn ask_text(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_owned());
        }
        let answer = input.interact_text_on(&self.term).map_err(map_dialoguer_error)?;
        Ok(answer.trim().to_owned())
    }

    fn ask_secret(&self, prompt: &str, existing_redacted: Option<&str>) -> Result<String> {
        let prompt = existing_redacted.map_or_else(
            || prompt.to_owned(),
            |hint| format!("{prompt} [{hint}, blank keeps it]"),
        );
        let answer = Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact_on(&self.term)
            .map_err(map_dialoguer_error)?;
        Ok(answer.trim().to_owned())
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_on(&self.term)
            .map_err(map_dialoguer_error)
    }

    fn show(&self, notice: &Notice) {
        if let Err(error) = self.term.write_line(&format_notice(notice)) {
            tracing::debug!(%error, "notice write failed");
        }
    }
}

/// Render a notice as one styled terminal line.
#[must_use]
pub fn format_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Info => style("•").cyan(),
        NoticeLevel::Success => style("✓").green().bold(),
        NoticeLevel::Warning => style("!").yellow().bold(),
    };
    format!("{marker} {}", notice.message)
}

/// Map a prompt failure; an interrupted read means the user cancelled.
pub fn map_dialoguer_error(error: dialoguer::Error) -> ErrorEnvelope {
    let dialoguer::Error::IO(error) = error;
    if error.kind() == io::ErrorKind::Interrupted {
        ErrorEnvelope::cancelled("input interrupted")
    } else {
        ErrorEnvelope::from(error)
    }
}
