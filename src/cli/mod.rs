//! CLI command handlers.
//!
//! Each subcommand is an `Args` struct with an `execute` method returning a
//! [`CliResult`].

pub mod build;
pub mod common;
pub mod inspect;
pub mod list;

pub use build::BuildArgs;
pub use common::{CliError, CliResult, ExitCode};
pub use inspect::InspectArgs;
pub use list::ListKeyboardsArgs;
