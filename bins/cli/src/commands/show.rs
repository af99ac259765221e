//! Show command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output};
use azure_setup_config::SetupSettings;
use azure_setup_infra::{StoredConfigSummary, origin_str, show_config_local};
use serde_json::Value;

/// Print the stored provider settings with the key masked.
pub fn run_show(mode: OutputMode, settings: &SetupSettings) -> Result<CliOutput, CliError> {
    match show_config_local(settings) {
        Ok(summary) => {
            let stdout = if mode.is_json() {
                format_show_json(&summary)?
            } else {
                format_show_text(&summary)
            };
            Ok(CliOutput {
                stdout,
                stderr: String::new(),
                exit_code: ExitCode::Ok,
            })
        },
        Err(error) => Ok(format_error_output(mode, &error, ExitCode::for_error(&error))),
    }
}

fn format_show_json(summary: &StoredConfigSummary) -> Result<String, CliError> {
    let mut payload = serde_json::to_value(summary)?;
    if let Some(object) = payload.as_object_mut() {
        object.insert("status".to_owned(), Value::String("ok".to_owned()));
    }
    let mut out = serde_json::to_string_pretty(&payload)?;
    out.push('\n');
    Ok(out)
}

fn format_show_text(summary: &StoredConfigSummary) -> String {
    let mut out = String::new();
    out.push_str("config: ");
    out.push_str(&summary.config_path.display().to_string());
    out.push('\n');
    out.push_str("file: ");
    out.push_str(origin_str(summary.origin));
    out.push('\n');
    if !summary.configured {
        out.push_str("provider: ");
        out.push_str(summary.provider);
        out.push_str(" (not configured)\n");
        return out;
    }
    let fields = [
        ("provider", Some(summary.provider)),
        ("model", summary.model.as_deref()),
        ("baseUrl", summary.base_url.as_deref()),
        ("deployment", summary.deployment.as_deref()),
        ("apiVersion", summary.api_version.as_deref()),
        ("apiKey", summary.api_key_redacted.as_deref()),
    ];
    for (key, value) in fields {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value.unwrap_or("-"));
        out.push('\n');
    }
    out
}
