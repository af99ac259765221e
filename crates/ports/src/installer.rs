//! Auxiliary component installation boundary contract.

use crate::BoxFuture;
use azure_setup_shared::SessionContext;

/// Result of one installation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStatus {
    /// The component was already present.
    AlreadyPresent,
    /// The component was installed.
    Installed,
    /// Installation was attempted and failed.
    Failed,
}

/// Report for one auxiliary component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Component name.
    pub component: Box<str>,
    /// Outcome.
    pub status: InstallStatus,
    /// Diagnostic detail on failure.
    pub detail: Option<Box<str>>,
    /// Command the user can run by hand when installation failed.
    pub manual_hint: Option<Box<str>>,
}

impl InstallReport {
    /// True unless installation failed.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        !matches!(self.status, InstallStatus::Failed)
    }
}

/// Boundary contract for best-effort installation of auxiliary components.
///
/// Implementations never fail; problems are described in the report.
pub trait AuxiliaryInstallerPort: Send + Sync {
    /// Names of the components this installer manages.
    fn components(&self) -> Vec<Box<str>>;

    /// Ensure `component` is installed.
    fn install<'a>(&'a self, ctx: &'a SessionContext, component: &'a str)
    -> BoxFuture<'a, InstallReport>;
}
