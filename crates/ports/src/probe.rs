//! Connectivity probe boundary contract.

use crate::BoxFuture;
use azure_setup_domain::{Credential, EndpointDescriptor, ProbeResult};
use azure_setup_shared::SessionContext;

/// Boundary contract for verifying an endpoint and credential.
///
/// Implementations never fail: transport errors and timeouts are
/// classified into the returned [`ProbeResult`].
pub trait ProbePort: Send + Sync {
    /// Send one minimal request and classify the outcome.
    fn probe<'a>(
        &'a self,
        ctx: &'a SessionContext,
        endpoint: &'a EndpointDescriptor,
        credential: &'a Credential,
    ) -> BoxFuture<'a, ProbeResult>;
}
