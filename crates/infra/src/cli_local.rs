//! Local CLI orchestration helpers.

use crate::{InfraError, InfraResult};
use azure_setup_adapters::{
    AzureChatProbe, AzureChatProbeConfig, FileConfigStore, HttpDefaultsFeed,
    HttpDefaultsFeedConfig, PackageManagerInstaller, TerminalPrompter, TracingLogger,
};
use azure_setup_app::{SetupDeps, SetupInput, SetupOutput, run_setup};
use azure_setup_config::SetupSettings;
use azure_setup_domain::PROVIDER_NAME;
use azure_setup_ports::{
    AuxiliaryInstallerPort, ConfigStorePort, DefaultsSourcePort, DocumentOrigin, LoggerPort,
    PromptPort,
};
use azure_setup_shared::SessionContext;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

/// Stored provider settings, safe to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfigSummary {
    /// Config file location.
    pub config_path: PathBuf,
    /// What was found at that location.
    #[serde(serialize_with = "serialize_origin")]
    pub origin: DocumentOrigin,
    /// Provider entry name.
    pub provider: &'static str,
    /// Whether the provider entry has connection options.
    pub configured: bool,
    /// Default model reference, e.g. `azure/gpt-5`.
    pub model: Option<Box<str>>,
    /// Stored base URL.
    pub base_url: Option<Box<str>>,
    /// Stored deployment.
    pub deployment: Option<Box<str>>,
    /// Stored API version.
    pub api_version: Option<Box<str>>,
    /// Masked API key.
    pub api_key_redacted: Option<String>,
}

/// Run the setup flow against the real terminal, network, and file system.
pub fn run_setup_local(settings: &SetupSettings, unattended: bool) -> InfraResult<SetupOutput> {
    let input = SetupInput {
        unattended,
        skip_extras: settings.skip_extras,
    };
    let deps = build_setup_deps(settings)?;
    run_async_with_ctx(SessionContext::start(), |ctx| async move {
        run_setup(&ctx, &deps, input).await
    })
}

/// Read the stored provider settings without modifying anything.
pub fn show_config_local(settings: &SetupSettings) -> InfraResult<StoredConfigSummary> {
    let store = FileConfigStore::new(&settings.config_path);
    let loaded = store.load();
    let document = loaded.document;
    let prior = document.provider_settings();

    Ok(StoredConfigSummary {
        config_path: settings.config_path.clone(),
        origin: loaded.origin,
        provider: PROVIDER_NAME,
        configured: prior.is_some(),
        model: document
            .as_map()
            .get("model")
            .and_then(Value::as_str)
            .map(Box::from),
        api_key_redacted: prior
            .as_ref()
            .and_then(|prior| prior.credential())
            .map(|credential| credential.redacted()),
        base_url: prior.as_ref().and_then(|prior| prior.base_url.clone()),
        deployment: prior.as_ref().and_then(|prior| prior.deployment.clone()),
        api_version: prior.and_then(|prior| prior.api_version),
    })
}

/// Wire production adapters for a setup session.
pub fn build_setup_deps(settings: &SetupSettings) -> InfraResult<SetupDeps> {
    let prompt: Arc<dyn PromptPort> = Arc::new(TerminalPrompter::stderr());
    let store: Arc<dyn ConfigStorePort> = Arc::new(FileConfigStore::new(&settings.config_path));
    let probe = Arc::new(AzureChatProbe::new(AzureChatProbeConfig {
        timeout: settings.probe_timeout,
    })?);
    let defaults = match settings.defaults_url.as_ref() {
        Some(url) => {
            let feed: Arc<dyn DefaultsSourcePort> =
                Arc::new(HttpDefaultsFeed::new(HttpDefaultsFeedConfig {
                    url: url.clone(),
                    timeout: settings.defaults_timeout,
                })?);
            Some(feed)
        },
        None => None,
    };
    let installer: Option<Arc<dyn AuxiliaryInstallerPort>> = if settings.skip_extras {
        None
    } else {
        Some(Arc::new(PackageManagerInstaller::default()))
    };
    let logger: Arc<dyn LoggerPort> = Arc::new(TracingLogger::new());

    Ok(SetupDeps {
        prompt,
        probe,
        store,
        defaults,
        installer,
        logger: Some(logger),
    })
}

fn serialize_origin<S: serde::Serializer>(
    origin: &DocumentOrigin,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(origin_str(*origin))
}

/// Stable name of a document origin.
#[must_use]
pub const fn origin_str(origin: DocumentOrigin) -> &'static str {
    match origin {
        DocumentOrigin::Missing => "missing",
        DocumentOrigin::Parsed => "parsed",
        DocumentOrigin::Malformed => "malformed",
        DocumentOrigin::Unreadable => "unreadable",
    }
}

fn run_async_with_ctx<F, T>(
    ctx: SessionContext,
    op: impl FnOnce(SessionContext) -> F,
) -> InfraResult<T>
where
    F: Future<Output = InfraResult<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(InfraError::from)?;
    runtime.block_on(async { op(ctx).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn settings(label: &str) -> SetupSettings {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or_default();
        SetupSettings {
            config_path: std::env::temp_dir()
                .join(format!("azure-setup-infra-{label}-{nanos}"))
                .join("opencode.json"),
            probe_timeout: Duration::from_secs(1),
            defaults_url: None,
            defaults_timeout: Duration::from_secs(1),
            skip_extras: true,
        }
    }

    #[test]
    fn show_reports_missing_config() -> InfraResult<()> {
        let summary = show_config_local(&settings("show-missing"))?;
        assert_eq!(summary.origin, DocumentOrigin::Missing);
        assert!(!summary.configured);
        assert_eq!(summary.api_key_redacted, None);
        Ok(())
    }

    #[test]
    fn show_masks_stored_key() -> InfraResult<()> {
        let settings = settings("show-stored");
        if let Some(parent) = settings.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(
            &settings.config_path,
            r#"{"model":"azure/gpt-5","provider":{"azure":{"options":{"baseURL":"https://foo.openai.azure.com/openai","apiKey":"sk-0123456789abcdef","apiVersion":"v1"},"models":{"gpt-5":{}}}}}"#, // pragma: allowlist secret
        )?;

        let summary = show_config_local(&settings)?;
        assert!(summary.configured);
        assert_eq!(summary.model.as_deref(), Some("azure/gpt-5"));
        assert_eq!(summary.deployment.as_deref(), Some("gpt-5"));
        let masked = summary.api_key_redacted.clone().unwrap_or_default();
        assert!(masked.starts_with("sk-0"));
        assert!(!masked.contains("0123456789abcdef"));

        let json = serde_json::to_value(&summary).map_err(|error| {
            InfraError::invariant(azure_setup_shared::ErrorCode::internal(), error.to_string())
        })?;
        assert_eq!(json.get("origin").and_then(Value::as_str), Some("parsed"));
        if let Some(parent) = settings.config_path.parent() {
            std::fs::remove_dir_all(parent)?;
        }
        Ok(())
    }

    #[test]
    fn deps_skip_installer_and_feed_when_not_configured() -> InfraResult<()> {
        let deps = build_setup_deps(&settings("deps"))?;
        assert!(deps.installer.is_none());
        assert!(deps.defaults.is_none());
        assert!(deps.logger.is_some());
        Ok(())
    }

    #[test]
    fn deps_include_feed_when_url_is_set() -> InfraResult<()> {
        let mut settings = settings("deps-feed");
        settings.defaults_url = Some("https://example.com/defaults.json".into());
        settings.skip_extras = false;

        let deps = build_setup_deps(&settings)?;
        assert!(deps.defaults.is_some());
        assert!(deps.installer.is_some());
        Ok(())
    }
}
