//! Setup command handler.

use crate::error::{CliError, ExitCode};
use crate::format::OutputMode;
use crate::{CliOutput, format_error_output};
use azure_setup_app::SetupOutput;
use azure_setup_config::SetupSettings;
use azure_setup_infra::run_setup_local;
use azure_setup_ports::{InstallReport, InstallStatus};
use serde_json::{Value, json};

/// Run the interactive (or unattended) setup flow.
pub fn run_setup_command(
    mode: OutputMode,
    settings: &SetupSettings,
    unattended: bool,
) -> Result<CliOutput, CliError> {
    match run_setup_local(settings, unattended) {
        Ok(output) => format_setup_output(mode, &output),
        Err(error) => Ok(format_error_output(mode, &error, ExitCode::for_error(&error))),
    }
}

fn format_setup_output(mode: OutputMode, output: &SetupOutput) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_json() {
        format_setup_json(output)?
    } else {
        format_setup_text(output)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_setup_json(output: &SetupOutput) -> Result<String, CliError> {
    let mut payload = serde_json::to_value(output)?;
    if let Some(object) = payload.as_object_mut() {
        object.insert("status".to_owned(), Value::String("ok".to_owned()));
        object.insert(
            "extras".to_owned(),
            Value::Array(output.extras.iter().map(extra_json).collect()),
        );
    }
    let mut out = serde_json::to_string_pretty(&payload)?;
    out.push('\n');
    Ok(out)
}

fn extra_json(report: &InstallReport) -> Value {
    json!({
        "component": report.component,
        "status": install_status_str(report.status),
        "detail": report.detail,
        "manualHint": report.manual_hint,
    })
}

fn format_setup_text(output: &SetupOutput) -> String {
    let mut out = String::new();
    out.push_str("status: ok\n");
    push_line(&mut out, "config", &output.config_path.display().to_string());
    push_line(&mut out, "baseUrl", output.endpoint.base_url());
    push_line(&mut out, "deployment", output.endpoint.deployment());
    push_line(&mut out, "apiVersion", output.endpoint.api_version());
    push_line(&mut out, "apiKey", &output.api_key_redacted);
    push_line(&mut out, "probe", &output.probe.summary());
    if !output.probe_outcome.verified() {
        out.push_str("warning: saved without a verified connection\n");
    }
    for report in &output.extras {
        let mut line = format!("{} {}", report.component, install_status_str(report.status));
        if let Some(hint) = report.manual_hint.as_deref() {
            line.push_str(" (run `");
            line.push_str(hint);
            line.push_str("`)");
        }
        push_line(&mut out, "extra", &line);
    }
    out
}

fn push_line(out: &mut String, key: &str, value: &str) {
    out.push_str(key);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

const fn install_status_str(status: InstallStatus) -> &'static str {
    match status {
        InstallStatus::AlreadyPresent => "present",
        InstallStatus::Installed => "installed",
        InstallStatus::Failed => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azure_setup_app::{ProbeOutcome, SetupMode, SetupStage};
    use azure_setup_domain::{EndpointDescriptor, ProbeResult};
    use std::path::PathBuf;

    fn sample() -> Result<SetupOutput, Box<dyn std::error::Error>> {
        Ok(SetupOutput {
            mode: SetupMode::Unattended,
            stages: vec![SetupStage::Init, SetupStage::Done],
            endpoint: EndpointDescriptor::from_parts(
                "https://foo.openai.azure.com/openai",
                "gpt-5",
                "2025-04-01-preview",
            )?,
            api_key_redacted: "sk-0****cdef".to_owned(),
            probe_outcome: ProbeOutcome::FailedUnattended,
            probe: ProbeResult::from_status(401, "denied"),
            config_path: PathBuf::from("/tmp/opencode.json"),
            extras: vec![InstallReport {
                component: "opencode".into(),
                status: InstallStatus::Failed,
                detail: Some("npm missing".into()),
                manual_hint: Some("npm install -g opencode-ai".into()),
            }],
        })
    }

    #[test]
    fn text_summary_flags_unverified_connection() -> Result<(), Box<dyn std::error::Error>> {
        let text = format_setup_text(&sample()?);
        assert!(text.contains("deployment: gpt-5\n"));
        assert!(text.contains("apiKey: sk-0****cdef\n"));
        assert!(text.contains("warning: saved without a verified connection"));
        assert!(text.contains("npm install -g opencode-ai"));
        Ok(())
    }

    #[test]
    fn json_summary_includes_extras() -> Result<(), Box<dyn std::error::Error>> {
        let text = format_setup_json(&sample()?)?;
        let payload: Value = serde_json::from_str(&text)?;
        assert_eq!(payload.get("status").and_then(Value::as_str), Some("ok"));
        assert_eq!(
            payload.get("probeOutcome").and_then(Value::as_str),
            Some("failedUnattended")
        );
        let extras = payload.get("extras").and_then(Value::as_array).ok_or("extras")?;
        assert_eq!(extras.len(), 1);
        Ok(())
    }
}
