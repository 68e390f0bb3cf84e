//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Manifest loading, privilege checks
//! and the run log are shared through [`CommandContext`].

pub mod completions;
pub mod context;
pub mod dispatcher;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod verify;

pub use context::{CommandContext, LoadedManifest};
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
