//! CLI E2E smoke tests.

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

fn run_cli(args: &[&str]) -> io::Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_azure-setup"))
        .args(args)
        .env_remove("AZURE_SETUP_CONFIG_PATH")
        .env_remove("AZURE_SETUP_DEFAULTS_URL")
        .env("AZURE_SETUP_LOG", "off")
        .output()
}

#[test]
fn help_lists_subcommands_and_unattended_flag() -> io::Result<()> {
    let output = run_cli(&["--help"])?;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("setup"));
    assert!(stdout.contains("show"));
    assert!(stdout.contains("--yes"));
    Ok(())
}

#[test]
fn show_without_config_succeeds() -> io::Result<()> {
    let path = temp_config("show-missing");
    let path_arg = path.to_string_lossy().to_string();

    let output = run_cli(&["show", "--config", &path_arg])?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not configured"));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn show_json_masks_stored_key() -> io::Result<()> {
    let path = temp_config("show-json");
    let parent = path.parent().ok_or_else(|| io::Error::other("no parent"))?;
    std::fs::create_dir_all(parent)?;
    std::fs::write(
        &path,
        r#"{"provider":{"azure":{"options":{"baseURL":"https://foo.openai.azure.com/openai","apiKey":"sk-0123456789abcdef","apiVersion":"2024-06-01"},"models":{"gpt-5":{"name":"gpt-5"}}}}}"#, // pragma: allowlist secret
    )?;
    let path_arg = path.to_string_lossy().to_string();

    let output = run_cli(&["show", "--config", &path_arg, "--output", "json"])?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).map_err(|error| io::Error::other(error.to_string()))?;
    assert_eq!(payload["configured"], serde_json::Value::Bool(true));
    assert_eq!(payload["deployment"], "gpt-5");
    assert!(!stdout.contains("0123456789abcdef"));

    std::fs::remove_dir_all(parent)?;
    Ok(())
}

#[test]
fn invalid_env_value_exits_with_invalid_input() -> io::Result<()> {
    let path = temp_config("bad-env");
    let path_arg = path.to_string_lossy().to_string();

    let output = Command::new(env!("CARGO_BIN_EXE_azure-setup"))
        .args(["show", "--config", &path_arg])
        .env("AZURE_SETUP_PROBE_TIMEOUT_MS", "soon")
        .env("AZURE_SETUP_LOG", "off")
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: "));
    Ok(())
}
