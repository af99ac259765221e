//! Diagnostic logging on stderr.

use crate::format::LogFormat;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,azure_setup_adapters=debug";

/// Install the global subscriber. An invalid directive falls back to `warn`.
pub fn init_tracing(filter: Option<&str>, verbose: bool, format: LogFormat) {
    let directive = if verbose {
        VERBOSE_FILTER
    } else {
        filter.unwrap_or(DEFAULT_FILTER)
    };
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    if let Err(error) = installed {
        eprintln!("log init failed: {error}");
    }
}
