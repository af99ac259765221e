//! Local CLI command handlers.

pub mod setup;
pub mod show;

pub use setup::run_setup_command;
pub use show::run_show;
