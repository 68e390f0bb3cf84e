//! Uninstall command implementation.
//!
//! The `baseline uninstall` command runs the `remove` unit of every step
//! that has one, last step first. With `--dry-run` it only prints what it
//! would do, and needs neither root nor a target user.

use crate::cli::args::UninstallArgs;
use crate::error::Result;
use crate::logging::RunLog;
use crate::runner::{ExecutionPlanner, Flow, Orchestrator, RunOptions, RunRequest};
use crate::shell::SystemExecutor;
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};
use super::list::show_steps;

/// The uninstall command implementation.
pub struct UninstallCommand {
    ctx: CommandContext,
    args: UninstallArgs,
}

impl UninstallCommand {
    /// Create a new uninstall command.
    pub fn new(ctx: &CommandContext, args: UninstallArgs) -> Self {
        Self {
            ctx: ctx.clone(),
            args,
        }
    }

    /// The run request named by `--only`.
    pub fn request(&self) -> RunRequest {
        self.args
            .only
            .clone()
            .map_or(RunRequest::All, RunRequest::Only)
    }
}

impl Command for UninstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = self.ctx.load()?;

        if self.args.list {
            show_steps(ui, ExecutionPlanner::reverse(&loaded.registry).view());
            return Ok(CommandResult::success());
        }

        let (target, mut log) = if self.args.dry_run {
            (self.ctx.try_target_user(), RunLog::disabled())
        } else {
            self.ctx.require_root()?;
            let target = self.ctx.target_user()?;
            let mut log = self.ctx.open_log(&loaded.manifest);
            log.line(&format!(
                "baseline {} uninstall: manifest {}, target user {}",
                env!("CARGO_PKG_VERSION"),
                loaded.path.display(),
                target.name
            ));
            (Some(target), log)
        };

        let settings = loaded.settings();
        let options = RunOptions {
            request: self.request(),
            auto: self.args.auto,
            dry_run: self.args.dry_run,
        };
        let mut executor = SystemExecutor;
        Orchestrator::new(&loaded.registry, &settings, target.as_ref()).run(
            Flow::Uninstall,
            &options,
            &mut executor,
            ui,
            &mut log,
        )?;

        if self.args.dry_run {
            ui.show_hint("Dry run: nothing was changed.");
        } else if let Some(path) = log.path() {
            ui.show_hint(&format!("Log: {}", path.display()));
        }

        Ok(CommandResult::success())
    }
}
