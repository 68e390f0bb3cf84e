//! Verify command implementation.
//!
//! The `baseline verify` command runs each step's `check` unit without
//! prompting and exits with the number of failed checks.

use crate::cli::args::VerifyArgs;
use crate::error::Result;
use crate::runner::{Flow, Orchestrator, RunOptions, RunRequest};
use crate::shell::SystemExecutor;
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};

/// The verify command implementation.
pub struct VerifyCommand {
    ctx: CommandContext,
    args: VerifyArgs,
}

impl VerifyCommand {
    /// Create a new verify command.
    pub fn new(ctx: &CommandContext, args: VerifyArgs) -> Self {
        Self {
            ctx: ctx.clone(),
            args,
        }
    }
}

/// Exit code for `failed` checks, saturating at 255.
pub fn failure_exit_code(failed: usize) -> i32 {
    failed.min(255) as i32
}

impl Command for VerifyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = self.ctx.load()?;
        self.ctx.require_root()?;
        let target = self.ctx.target_user()?;
        let settings = loaded.settings();

        let mut log = self.ctx.open_log(&loaded.manifest);
        log.line(&format!(
            "baseline {} verify: manifest {}",
            env!("CARGO_PKG_VERSION"),
            loaded.path.display()
        ));

        let options = RunOptions {
            request: self
                .args
                .only
                .clone()
                .map_or(RunRequest::All, RunRequest::Only),
            auto: true,
            dry_run: false,
        };
        let mut executor = SystemExecutor;
        let report = Orchestrator::new(&loaded.registry, &settings, Some(&target)).run(
            Flow::Verify,
            &options,
            &mut executor,
            ui,
            &mut log,
        )?;

        match report.summary.failed {
            0 => Ok(CommandResult::success()),
            failed => Ok(CommandResult::failure(failure_exit_code(failed))),
        }
    }
}
