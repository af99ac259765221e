//! Unattended setup E2E tests.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_config(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("azure-setup-e2e-{label}-{unique}"))
        .join("opencode.json")
}

fn run_unattended(path: &PathBuf, extra: &[&str]) -> io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_azure-setup"))
        .arg("--yes")
        .arg("--skip-extras")
        .args(extra)
        .env("AZURE_SETUP_CONFIG_PATH", path)
        .env("AZURE_SETUP_PROBE_TIMEOUT_MS", "500")
        .env("AZURE_SETUP_LOG", "off")
        .env_remove("AZURE_SETUP_DEFAULTS_URL")
        .output()
}

#[test]
fn unattended_without_prior_config_fails_without_writing() -> io::Result<()> {
    let path = temp_config("no-prior");

    let output = run_unattended(&path, &[])?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: unattended mode needs"));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn unattended_with_unreachable_endpoint_still_commits() -> io::Result<()> {
    let path = temp_config("unreachable");
    let parent = path.parent().ok_or_else(|| io::Error::other("no parent"))?;
    std::fs::create_dir_all(parent)?;
    std::fs::write(
        &path,
        r#"{"theme":"dark","provider":{"azure":{"options":{"baseURL":"http://127.0.0.1:9/openai","apiKey":"sk-0123456789abcdef","apiVersion":"2024-06-01"},"models":{"gpt-5":{"name":"gpt-5"}}}}}"#, // pragma: allowlist secret
    )?;

    let output = run_unattended(&path, &["--output", "json"])?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).map_err(|error| io::Error::other(error.to_string()))?;
    assert_eq!(payload["probeOutcome"], "failedUnattended");
    assert!(!stdout.contains("0123456789abcdef"));

    let saved = std::fs::read_to_string(&path)?;
    assert!(saved.contains("\"theme\": \"dark\""));
    assert!(saved.contains("\"model\": \"azure/gpt-5\""));
    assert!(saved.contains("\"useDeploymentBasedUrls\": true"));

    std::fs::remove_dir_all(parent)?;
    Ok(())
}
