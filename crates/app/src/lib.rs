//! # azure-setup-app
//!
//! The setup use case: a linear flow over prompt, probe, and store ports.
//! This crate depends on `ports`, `domain`, and `shared`.

pub mod setup;

pub use setup::{
    ProbeOutcome, SetupDeps, SetupInput, SetupMode, SetupOutput, SetupStage, run_setup,
};

/// Crate version, used by layering smoke tests.
#[must_use]
pub const fn app_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
