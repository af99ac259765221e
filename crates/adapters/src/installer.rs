//! Best-effort installer for auxiliary command-line components.

use azure_setup_ports::{AuxiliaryInstallerPort, BoxFuture, InstallReport, InstallStatus};
use azure_setup_shared::{ErrorEnvelope, SessionContext, is_timeout, timeout_with_context};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Upper bound for one detect or install command.
pub const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

const MAX_DETAIL_CHARS: usize = 400;

/// How to detect and install one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecipe {
    /// Component name reported to the user.
    pub name: Box<str>,
    /// Command that succeeds when the component is present.
    pub detect: Vec<Box<str>>,
    /// Command that installs the component.
    pub install: Vec<Box<str>>,
    /// What the user can run by hand if installation fails.
    pub manual_hint: Box<str>,
}

impl ComponentRecipe {
    /// The opencode assistant CLI, installed from npm.
    #[must_use]
    pub fn opencode() -> Self {
        Self {
            name: "opencode".into(),
            detect: vec!["opencode".into(), "--version".into()],
            install: vec![
                "npm".into(),
                "install".into(),
                "-g".into(),
                "opencode-ai".into(),
            ],
            manual_hint: "npm install -g opencode-ai".into(),
        }
    }
}

/// Runs detect/install commands through the system package manager.
#[derive(Debug, Clone)]
pub struct PackageManagerInstaller {
    components: Vec<ComponentRecipe>,
    timeout: Duration,
}

impl PackageManagerInstaller {
    /// Installer for the given components.
    #[must_use]
    pub const fn new(components: Vec<ComponentRecipe>) -> Self {
        Self {
            components,
            timeout: DEFAULT_INSTALL_TIMEOUT,
        }
    }

    /// Override the per-command timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn ensure(&self, ctx: &SessionContext, recipe: &ComponentRecipe) -> InstallReport {
        if self.run(ctx, &recipe.detect).await.is_ok() {
            return report(recipe, InstallStatus::AlreadyPresent, None);
        }
        tracing::debug!(component = %recipe.name, "component missing, installing");

        match self.run(ctx, &recipe.install).await {
            Ok(()) => report(recipe, InstallStatus::Installed, None),
            Err(detail) => report(recipe, InstallStatus::Failed, Some(detail)),
        }
    }

    async fn run(&self, ctx: &SessionContext, argv: &[Box<str>]) -> Result<(), String> {
        let Some((program, args)) = argv.split_first() else {
            return Err("empty command".to_owned());
        };
        let mut command = Command::new(&**program);
        command
            .args(args.iter().map(|arg| &**arg))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout_with_context(ctx, self.timeout, "installer.run", async {
            command.output().await.map_err(ErrorEnvelope::from)
        })
        .await;

        match output {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(truncate(&format!("{program} exited with {}: {}", output.status, stderr.trim())))
            },
            Err(error) if is_timeout(&error) => {
                Err(format!("{program} timed out after {}s", self.timeout.as_secs()))
            },
            Err(error) => Err(truncate(&format!("{program}: {}", error.message))),
        }
    }
}

impl Default for PackageManagerInstaller {
    fn default() -> Self {
        Self::new(vec![ComponentRecipe::opencode()])
    }
}

impl AuxiliaryInstallerPort for PackageManagerInstaller {
    fn components(&self) -> Vec<Box<str>> {
        self.components.iter().map(|recipe| recipe.name.clone()).collect()
    }

    fn install<'a>(
        &'a self,
        ctx: &'a SessionContext,
        component: &'a str,
    ) -> BoxFuture<'a, InstallReport> {
        Box::pin(async move {
            match self.components.iter().find(|recipe| &*recipe.name == component) {
                Some(recipe) => self.ensure(ctx, recipe).await,
                None => InstallReport {
                    component: component.into(),
                    status: InstallStatus::Failed,
                    detail: Some("unknown component".into()),
                    manual_hint: None,
                },
            }
        })
    }
}

fn report(recipe: &ComponentRecipe, status: InstallStatus, detail: Option<String>) -> InstallReport {
    let failed = matches!(status, InstallStatus::Failed);
    InstallReport {
        component: recipe.name.clone(),
        status,
        detail: detail.map(String::into_boxed_str),
        manual_hint: failed.then(|| recipe.manual_hint.clone()),
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_DETAIL_CHARS {
        return text.to_owned();
    }
    let mut cut: String = text.chars().take(MAX_DETAIL_CHARS).collect();
    cut.push('…');
    cut
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn recipe(detect: &[&str], install: &[&str]) -> ComponentRecipe {
        ComponentRecipe {
            name: "tool".into(),
            detect: detect.iter().map(|arg| (*arg).into()).collect(),
            install: install.iter().map(|arg| (*arg).into()).collect(),
            manual_hint: "install tool by hand".into(),
        }
    }

    #[tokio::test]
    async fn present_component_is_not_reinstalled() {
        let installer = PackageManagerInstaller::new(vec![recipe(
            &["sh", "-c", "exit 0"],
            &["sh", "-c", "exit 1"],
        )]);
        let ctx = SessionContext::start();

        let report = installer.install(&ctx, "tool").await;
        assert_eq!(report.status, InstallStatus::AlreadyPresent);
        assert!(report.manual_hint.is_none());
    }

    #[tokio::test]
    async fn missing_component_gets_installed() {
        let installer = PackageManagerInstaller::new(vec![recipe(
            &["azure-setup-definitely-missing-binary"],
            &["sh", "-c", "exit 0"],
        )]);
        let ctx = SessionContext::start();

        let report = installer.install(&ctx, "tool").await;
        assert_eq!(report.status, InstallStatus::Installed);
    }

    #[tokio::test]
    async fn failed_install_reports_hint_and_stderr() {
        let installer = PackageManagerInstaller::new(vec![recipe(
            &["sh", "-c", "exit 1"],
            &["sh", "-c", "echo registry down >&2; exit 3"],
        )]);
        let ctx = SessionContext::start();

        let report = installer.install(&ctx, "tool").await;
        assert_eq!(report.status, InstallStatus::Failed);
        assert!(!report.succeeded());
        assert_eq!(report.manual_hint.as_deref(), Some("install tool by hand"));
        assert!(report.detail.as_deref().is_some_and(|detail| detail.contains("registry down")));
    }

    #[tokio::test]
    async fn slow_install_times_out() {
        let installer = PackageManagerInstaller::new(vec![recipe(
            &["sh", "-c", "exit 1"],
            &["sh", "-c", "sleep 5"],
        )])
        .with_timeout(Duration::from_millis(100));
        let ctx = SessionContext::start();

        let report = installer.install(&ctx, "tool").await;
        assert_eq!(report.status, InstallStatus::Failed);
        assert!(report.detail.as_deref().is_some_and(|detail| detail.contains("timed out")));
    }

    #[tokio::test]
    async fn unknown_component_fails_without_running_anything() {
        let installer = PackageManagerInstaller::default();
        let ctx = SessionContext::start();

        let report = installer.install(&ctx, "nope").await;
        assert_eq!(report.status, InstallStatus::Failed);
        assert_eq!(installer.components(), vec![Box::<str>::from("opencode")]);
    }
}
