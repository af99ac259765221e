//! Setup orchestration: resolve prior state, gather input, probe, commit.
//!
//! The flow is a single linear pass over [`SetupStage`]. All terminal and
//! network access goes through ports so every branch runs under test with
//! scripted answers.

use azure_setup_domain::{
    ConfigDocument, Credential, EndpointDefaults, EndpointDescriptor, ProbeResult,
    ProviderSettings, parse_endpoint,
};
use azure_setup_ports::{
    AuxiliaryInstallerPort, ConfigStorePort, DefaultsSourcePort, InstallReport, LogFields,
    LoggerPort, Notice, ProbePort, PromptPort,
};
use azure_setup_shared::{ErrorCode, ErrorEnvelope, Result, SessionContext};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

const PROMPT_ENDPOINT: &str = "Azure OpenAI endpoint";
const PROMPT_API_KEY: &str = "API key";
const PROMPT_DEPLOYMENT: &str = "Deployment name";
const PROMPT_API_VERSION: &str = "API version";
const PROMPT_ACCEPT_FAILURE: &str = "Save this configuration anyway?";

/// States of the setup flow, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SetupStage {
    /// Session started.
    Init,
    /// Existing config loaded and inspected.
    ResolvePriorConfig,
    /// Endpoint asked for or taken from prior state.
    GatherEndpoint,
    /// API key asked for or taken from prior state.
    GatherCredential,
    /// Deployment confirmed.
    GatherDeployment,
    /// Connectivity probe issued.
    Probe,
    /// Deployment and API version asked for again after a failed probe.
    RetryPrompt,
    /// User asked whether to keep a configuration that failed to probe.
    AcceptFailure,
    /// Document merged and written.
    Commit,
    /// Flow finished.
    Done,
}

impl SetupStage {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ResolvePriorConfig => "resolvePriorConfig",
            Self::GatherEndpoint => "gatherEndpoint",
            Self::GatherCredential => "gatherCredential",
            Self::GatherDeployment => "gatherDeployment",
            Self::Probe => "probe",
            Self::RetryPrompt => "retryPrompt",
            Self::AcceptFailure => "acceptFailure",
            Self::Commit => "commit",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the session gathers its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SetupMode {
    /// No usable prior settings; every value is asked for.
    InteractiveFresh,
    /// Prior settings are offered as defaults.
    InteractiveReuse,
    /// No prompts; prior settings are required.
    Unattended,
}

impl SetupMode {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InteractiveFresh => "interactiveFresh",
            Self::InteractiveReuse => "interactiveReuse",
            Self::Unattended => "unattended",
        }
    }

    const fn is_interactive(self) -> bool {
        !matches!(self, Self::Unattended)
    }
}

/// How the probe step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeOutcome {
    /// First probe succeeded.
    Passed,
    /// The retry probe succeeded.
    PassedOnRetry,
    /// Both probes failed and the user chose to save anyway.
    FailedAccepted,
    /// The probe failed in unattended mode; saved regardless.
    FailedUnattended,
}

impl ProbeOutcome {
    /// True when the final probe reached the endpoint successfully.
    #[must_use]
    pub const fn verified(self) -> bool {
        matches!(self, Self::Passed | Self::PassedOnRetry)
    }
}

/// Input for a setup session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupInput {
    /// Suppress every prompt and rely on prior settings.
    pub unattended: bool,
    /// Do not install auxiliary components.
    pub skip_extras: bool,
}

/// Dependencies required by the setup flow.
#[derive(Clone)]
pub struct SetupDeps {
    /// User interaction.
    pub prompt: Arc<dyn PromptPort>,
    /// Connectivity probe.
    pub probe: Arc<dyn ProbePort>,
    /// Assistant config file.
    pub store: Arc<dyn ConfigStorePort>,
    /// Optional remote defaults.
    pub defaults: Option<Arc<dyn DefaultsSourcePort>>,
    /// Optional auxiliary component installer.
    pub installer: Option<Arc<dyn AuxiliaryInstallerPort>>,
    /// Optional logger.
    pub logger: Option<Arc<dyn LoggerPort>>,
}

/// Result of a committed setup session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupOutput {
    /// Input mode the session ran in.
    pub mode: SetupMode,
    /// Stages entered, in order.
    pub stages: Vec<SetupStage>,
    /// Endpoint that was saved.
    pub endpoint: EndpointDescriptor,
    /// Masked form of the saved key.
    pub api_key_redacted: String,
    /// How the probe step ended.
    pub probe_outcome: ProbeOutcome,
    /// Last probe result.
    pub probe: ProbeResult,
    /// File that was written.
    pub config_path: PathBuf,
    /// Auxiliary component reports; empty when skipped.
    #[serde(skip)]
    pub extras: Vec<InstallReport>,
}

/// Run one setup session end to end.
///
/// Fatal errors return before the store is written. Probe failures never
/// prevent the commit in unattended mode.
pub async fn run_setup(
    ctx: &SessionContext,
    deps: &SetupDeps,
    input: SetupInput,
) -> Result<SetupOutput> {
    let logger = scoped_logger(deps.logger.as_ref(), ctx);
    if let Some(logger) = logger.as_deref() {
        let mut fields = LogFields::new();
        fields.insert("unattended".into(), Value::Bool(input.unattended));
        fields.insert(
            "configPath".into(),
            Value::String(deps.store.location().display().to_string()),
        );
        logger.info("setup.start", "Setup started", Some(fields));
    }

    let mut flow = SetupFlow {
        ctx,
        deps,
        logger: logger.as_deref(),
        stages: Vec::new(),
    };
    let result = flow.execute(input).await;

    if let Err(error) = result.as_ref() {
        if let Some(logger) = logger.as_deref() {
            if error.is_cancelled() {
                logger.info("setup.cancelled", "Setup cancelled", None);
            } else {
                let mut fields = LogFields::new();
                if let Some(stage) = flow.stages.last() {
                    fields.insert("stage".into(), Value::String(stage.as_str().to_owned()));
                }
                logger.error("setup.failed", error, Some(fields));
            }
        }
    }
    result
}

struct SetupFlow<'a> {
    ctx: &'a SessionContext,
    deps: &'a SetupDeps,
    logger: Option<&'a dyn LoggerPort>,
    stages: Vec<SetupStage>,
}

impl SetupFlow<'_> {
    async fn execute(&mut self, input: SetupInput) -> Result<SetupOutput> {
        self.enter(SetupStage::Init);

        self.enter(SetupStage::ResolvePriorConfig);
        let loaded = self.deps.store.load();
        if loaded.origin.is_degraded() {
            self.warn(
                "setup.prior.malformed",
                "Existing config could not be read; starting from an empty document",
                field("origin", &format!("{:?}", loaded.origin)),
            );
        }
        let mut document = loaded.document;
        let prior = document.provider_settings();
        let mode = select_mode(input.unattended, prior.as_ref());
        let prior = prior.unwrap_or_default();
        let prior_credential = prior.credential();

        let unattended_credential = if mode.is_interactive() {
            None
        } else {
            Some(require_prior(&prior, prior_credential.as_ref())?)
        };
        let defaults = self.resolve_defaults().await;

        self.enter(SetupStage::GatherEndpoint);
        let endpoint = self.gather_endpoint(mode, &prior, &defaults)?;

        self.enter(SetupStage::GatherCredential);
        let credential = match unattended_credential {
            Some(credential) => credential,
            None => self.gather_credential(prior_credential)?,
        };

        self.enter(SetupStage::GatherDeployment);
        let endpoint = self.gather_deployment(mode, &prior, endpoint)?;

        let (endpoint, probe, probe_outcome) = self.verify(mode, endpoint, &credential).await?;

        self.enter(SetupStage::Commit);
        document.merge(&endpoint, &credential);
        let config_path = self.commit(&document)?;

        let extras = if input.skip_extras {
            Vec::new()
        } else {
            self.install_extras().await
        };

        self.enter(SetupStage::Done);
        Ok(SetupOutput {
            mode,
            stages: std::mem::take(&mut self.stages),
            endpoint,
            api_key_redacted: credential.redacted(),
            probe_outcome,
            probe,
            config_path,
            extras,
        })
    }

    async fn resolve_defaults(&self) -> EndpointDefaults {
        let builtin = EndpointDefaults::builtin();
        let Some(source) = self.deps.defaults.as_ref() else {
            return builtin;
        };
        match source.fetch(self.ctx).await {
            Some(published) => builtin.overridden_by(
                published.deployment.as_deref(),
                published.api_version.as_deref(),
            ),
            None => builtin,
        }
    }

    fn gather_endpoint(
        &self,
        mode: SetupMode,
        prior: &ProviderSettings,
        defaults: &EndpointDefaults,
    ) -> Result<EndpointDescriptor> {
        let reuse_defaults = EndpointDefaults::new(
            prior
                .deployment
                .clone()
                .unwrap_or_else(|| defaults.deployment.clone()),
            prior
                .api_version
                .clone()
                .unwrap_or_else(|| defaults.api_version.clone()),
        );
        let prior_base = prior.base_url.as_deref();

        match mode {
            SetupMode::Unattended => Ok(EndpointDescriptor::from_parts(
                prior_base.unwrap_or_default(),
                &reuse_defaults.deployment,
                &reuse_defaults.api_version,
            )?),
            SetupMode::InteractiveFresh => {
                let raw = self.deps.prompt.ask_text(PROMPT_ENDPOINT, None)?;
                Ok(parse_endpoint(&raw, defaults)?)
            },
            SetupMode::InteractiveReuse => {
                let raw = self.deps.prompt.ask_text(PROMPT_ENDPOINT, prior_base)?;
                match prior_base {
                    Some(base) if raw.is_empty() || raw == base => {
                        self.debug("setup.endpoint.kept", "Keeping stored endpoint");
                        Ok(EndpointDescriptor::from_parts(
                            base,
                            &reuse_defaults.deployment,
                            &reuse_defaults.api_version,
                        )?)
                    },
                    _ => Ok(parse_endpoint(&raw, &reuse_defaults)?),
                }
            },
        }
    }

    fn gather_credential(&self, prior: Option<Credential>) -> Result<Credential> {
        let hint = prior.as_ref().map(Credential::redacted);
        let answer = self.deps.prompt.ask_secret(PROMPT_API_KEY, hint.as_deref())?;
        match prior {
            Some(prior) if answer.trim().is_empty() => Ok(prior),
            _ => Credential::new(&answer),
        }
    }

    fn gather_deployment(
        &self,
        mode: SetupMode,
        prior: &ProviderSettings,
        endpoint: EndpointDescriptor,
    ) -> Result<EndpointDescriptor> {
        if !mode.is_interactive() || prior.deployment.as_deref() == Some(endpoint.deployment()) {
            return Ok(endpoint);
        }
        let deployment = self
            .deps
            .prompt
            .ask_text(PROMPT_DEPLOYMENT, Some(endpoint.deployment()))?;
        Ok(endpoint.with_deployment(&deployment, endpoint.api_version())?)
    }

    async fn verify(
        &mut self,
        mode: SetupMode,
        endpoint: EndpointDescriptor,
        credential: &Credential,
    ) -> Result<(EndpointDescriptor, ProbeResult, ProbeOutcome)> {
        let first = self.probe(&endpoint, credential).await;
        if first.ok() {
            return Ok((endpoint, first, ProbeOutcome::Passed));
        }
        if !mode.is_interactive() {
            self.deps.prompt.show(&Notice::warning(format!(
                "{}; saving the configuration anyway",
                first.summary()
            )));
            return Ok((endpoint, first, ProbeOutcome::FailedUnattended));
        }
        self.show_probe_failure(&first);

        self.enter(SetupStage::RetryPrompt);
        let deployment = self
            .deps
            .prompt
            .ask_text(PROMPT_DEPLOYMENT, Some(endpoint.deployment()))?;
        let api_version = self
            .deps
            .prompt
            .ask_text(PROMPT_API_VERSION, Some(endpoint.api_version()))?;
        let endpoint = endpoint.with_deployment(&deployment, &api_version)?;

        let second = self.probe(&endpoint, credential).await;
        if second.ok() {
            return Ok((endpoint, second, ProbeOutcome::PassedOnRetry));
        }
        self.show_probe_failure(&second);

        self.enter(SetupStage::AcceptFailure);
        if self.deps.prompt.confirm(PROMPT_ACCEPT_FAILURE, false)? {
            Ok((endpoint, second, ProbeOutcome::FailedAccepted))
        } else {
            Err(ErrorEnvelope::expected(
                ErrorCode::setup("declined"),
                "connectivity check failed and the configuration was not saved",
            ))
        }
    }

    async fn probe(
        &mut self,
        endpoint: &EndpointDescriptor,
        credential: &Credential,
    ) -> ProbeResult {
        self.enter(SetupStage::Probe);
        let result = self.deps.probe.probe(self.ctx, endpoint, credential).await;

        let mut fields = LogFields::new();
        fields.insert("endpoint".into(), Value::String(endpoint.to_string()));
        if let Some(status) = result.status_code() {
            fields.insert("statusCode".into(), Value::from(status));
        }
        if result.ok() {
            self.info("setup.probe.passed", "Connectivity probe passed", fields);
        } else {
            if let Some(failure) = result.failure() {
                fields.insert("failure".into(), Value::String(failure.to_string()));
            }
            self.warn("setup.probe.failed", "Connectivity probe failed", fields);
        }
        result
    }

    fn show_probe_failure(&self, result: &ProbeResult) {
        let body = result.display_body();
        let message = if body.trim().is_empty() {
            result.summary()
        } else {
            format!("{}\n{body}", result.summary())
        };
        self.deps.prompt.show(&Notice::warning(message));
    }

    fn commit(&self, document: &ConfigDocument) -> Result<PathBuf> {
        let path = self.deps.store.persist(document)?;
        self.info(
            "setup.commit.completed",
            "Configuration saved",
            field("configPath", &path.display().to_string()),
        );
        self.deps.prompt.show(&Notice::success(format!(
            "Saved configuration to {}",
            path.display()
        )));
        Ok(path)
    }

    async fn install_extras(&self) -> Vec<InstallReport> {
        let Some(installer) = self.deps.installer.as_ref() else {
            return Vec::new();
        };
        let mut reports = Vec::new();
        for component in installer.components() {
            let report = installer.install(self.ctx, &component).await;
            if report.succeeded() {
                self.deps
                    .prompt
                    .show(&Notice::info(format!("{component} is installed")));
            } else {
                let mut fields = field("component", &component);
                if let Some(detail) = report.detail.as_deref() {
                    fields.insert("detail".into(), Value::String(detail.to_owned()));
                }
                self.warn("setup.extras.failed", "Auxiliary install failed", fields);
                let hint = report
                    .manual_hint
                    .as_deref()
                    .map(|hint| format!("; install it manually with `{hint}`"))
                    .unwrap_or_default();
                self.deps.prompt.show(&Notice::warning(format!(
                    "could not install {component}{hint}"
                )));
            }
            reports.push(report);
        }
        reports
    }

    fn enter(&mut self, stage: SetupStage) {
        self.stages.push(stage);
        if let Some(logger) = self.logger {
            logger.debug("setup.stage", "Entering stage", Some(field("stage", stage.as_str())));
        }
    }

    fn debug(&self, event: &str, message: &str) {
        if let Some(logger) = self.logger {
            logger.debug(event, message, None);
        }
    }

    fn info(&self, event: &str, message: &str, fields: LogFields) {
        if let Some(logger) = self.logger {
            logger.info(event, message, Some(fields));
        }
    }

    fn warn(&self, event: &str, message: &str, fields: LogFields) {
        if let Some(logger) = self.logger {
            logger.warn(event, message, Some(fields));
        }
    }
}

fn select_mode(unattended: bool, prior: Option<&ProviderSettings>) -> SetupMode {
    if unattended {
        SetupMode::Unattended
    } else if prior.is_some() {
        SetupMode::InteractiveReuse
    } else {
        SetupMode::InteractiveFresh
    }
}

fn require_prior(prior: &ProviderSettings, credential: Option<&Credential>) -> Result<Credential> {
    match (prior.base_url.as_deref(), credential) {
        (Some(_), Some(credential)) => Ok(credential.clone()),
        _ => Err(ErrorEnvelope::expected(
            ErrorCode::setup("missing_prior_config"),
            "unattended mode needs an existing Azure endpoint and API key; run setup interactively first",
        )),
    }
}

fn scoped_logger(
    logger: Option<&Arc<dyn LoggerPort>>,
    ctx: &SessionContext,
) -> Option<Box<dyn LoggerPort>> {
    let logger = logger?;
    Some(logger.child(field("sessionId", ctx.session_id().as_str())))
}

fn field(key: &str, value: &str) -> LogFields {
    let mut fields = LogFields::new();
    fields.insert(key.into(), Value::String(value.to_owned()));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use azure_setup_domain::ProviderSettings;

    #[test]
    fn mode_follows_flag_then_prior_state() {
        let prior = ProviderSettings::default();
        assert_eq!(select_mode(true, Some(&prior)), SetupMode::Unattended);
        assert_eq!(select_mode(true, None), SetupMode::Unattended);
        assert_eq!(select_mode(false, Some(&prior)), SetupMode::InteractiveReuse);
        assert_eq!(select_mode(false, None), SetupMode::InteractiveFresh);
    }

    #[test]
    fn unattended_needs_both_endpoint_and_key() -> Result<()> {
        let key = Credential::new("sk-0123456789")?;
        let mut prior = ProviderSettings::default();

        let error = require_prior(&prior, Some(&key)).err();
        assert!(error.is_some_and(|error| error.has_code("setup", "missing_prior_config")));

        prior.base_url = Some("https://foo.openai.azure.com/openai".into());
        assert!(require_prior(&prior, None).is_err());
        assert_eq!(require_prior(&prior, Some(&key))?, key);
        Ok(())
    }

    #[test]
    fn only_verified_outcomes_count_as_verified() {
        assert!(ProbeOutcome::Passed.verified());
        assert!(ProbeOutcome::PassedOnRetry.verified());
        assert!(!ProbeOutcome::FailedAccepted.verified());
        assert!(!ProbeOutcome::FailedUnattended.verified());
    }
}
