//! CLI binary entrypoint.

mod commands;
mod error;
mod format;
mod logging;

use azure_setup_config::{SettingsOverrides, SetupEnv};
use azure_setup_infra::{InfraError, InfraResult, load_env, resolve_settings};
use clap::{Args, Parser, Subcommand};
use commands::{run_setup_command, run_show};
use error::{CliError, ExitCode};
use format::{LogFormat, OutputArgs, OutputMode};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "azure-setup",
    version,
    about = "Point the opencode assistant at an Azure OpenAI deployment",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    settings: SettingsArgs,

    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Configure the Azure provider (default).
    Setup,
    /// Print the stored Azure provider settings with the key masked.
    Show,
}

#[derive(Debug, Args)]
struct SettingsArgs {
    /// Config file to update. Defaults to `~/.config/opencode/opencode.json`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Do not prompt; reuse the stored endpoint and key.
    #[arg(
        long = "yes",
        short = 'y',
        visible_aliases = ["non-interactive", "unattended"],
        global = true
    )]
    unattended: bool,
    /// Skip installing the opencode CLI.
    #[arg(long, global = true)]
    skip_extras: bool,
    /// Connectivity probe timeout in milliseconds.
    #[arg(long, global = true)]
    probe_timeout_ms: Option<u64>,
}

#[derive(Debug, Args)]
struct LoggingArgs {
    /// Log debug events to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    /// Log line format on stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);
    let env = load_env();
    logging::init_tracing(log_filter(&env), cli.logging.verbose, cli.logging.log_format);

    match run(&cli, mode, env) {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

// An invalid env is reported by `run`; logging falls back to its default.
fn log_filter(env: &InfraResult<SetupEnv>) -> Option<&str> {
    env.as_ref().ok().and_then(|env| env.log_filter.as_deref())
}

fn run(cli: &Cli, mode: OutputMode, env: InfraResult<SetupEnv>) -> Result<CliOutput, CliError> {
    let overrides = SettingsOverrides {
        config_path: cli.settings.config.clone(),
        probe_timeout_ms: cli.settings.probe_timeout_ms,
        skip_extras: cli.settings.skip_extras,
    };
    let settings = match env.and_then(|env| resolve_settings(&env, &overrides)) {
        Ok(settings) => settings,
        Err(error) => return Ok(format_error_output(mode, &error, ExitCode::for_error(&error))),
    };
    tracing::debug!(config = %settings.config_path.display(), "settings resolved");

    match cli.command {
        None | Some(Commands::Setup) => {
            run_setup_command(mode, &settings, cli.settings.unattended)
        },
        Some(Commands::Show) => run_show(mode, &settings),
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.stdout.as_bytes())?;
    stdout.flush()?;
    if !output.stderr.is_empty() {
        let mut stderr = io::stderr().lock();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }
    Ok(())
}

pub(crate) fn format_error_output(
    mode: OutputMode,
    error: &InfraError,
    exit_code: ExitCode,
) -> CliOutput {
    let stderr = format!("error: {}\n", error.message);

    let stdout = if mode.is_json() {
        let payload = serde_json::json!({
            "status": "error",
            "error": {
                "code": error.code.to_string(),
                "message": error.message,
                "kind": error.kind,
            },
        });
        // This is a CLI boundary, so JSON serialization errors are internal.
        let mut output = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| {
            "{\"status\":\"error\",\"error\":{\"code\":\"core:internal\",\"message\":\"internal error\"}}".to_string()
        });
        output.push('\n');
        output
    } else {
        String::new()
    };

    CliOutput {
        stdout,
        stderr,
        exit_code,
    }
}
