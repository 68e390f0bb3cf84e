//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::ui::UserInterface;

use super::completions::CompletionsCommand;
use super::context::CommandContext;
use super::install::InstallCommand;
use super::list::ListCommand;
use super::uninstall::UninstallCommand;
use super::verify::VerifyCommand;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    cwd: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher; `cwd` is where `baseline.yml` is looked up.
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd }
    }

    /// Get the working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = CommandContext::from_cli(cli, self.cwd.clone());
        match &cli.command {
            Commands::Install(args) => InstallCommand::new(&ctx, args.clone()).execute(ui),
            Commands::Uninstall(args) => UninstallCommand::new(&ctx, args.clone()).execute(ui),
            Commands::Verify(args) => VerifyCommand::new(&ctx, args.clone()).execute(ui),
            Commands::List(args) => ListCommand::new(&ctx, args.clone()).execute(ui),
            Commands::Completions(args) => CompletionsCommand::new(args.clone()).execute(ui),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(1);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"));
        assert_eq!(dispatcher.cwd(), Path::new("/test"));
    }

    #[test]
    fn dispatch_reports_missing_manifest() {
        use crate::error::BaselineError;
        use clap::Parser;

        let temp = tempfile::TempDir::new().unwrap();
        let missing = temp.path().join("missing.yml");
        let cli = Cli::try_parse_from([
            "baseline",
            "--manifest",
            missing.to_str().unwrap(),
            "list",
        ])
        .unwrap();
        let mut ui = crate::ui::MockUI::new();

        let err = CommandDispatcher::new(temp.path().to_path_buf())
            .dispatch(&cli, &mut ui)
            .unwrap_err();
        assert!(matches!(err, BaselineError::ManifestNotFound { .. }));
    }
}
