//! Install command implementation.
//!
//! The `baseline install` command walks the registry in order, gating each
//! step, and offers a reboot after steps that need one.

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::runner::{ExecutionPlanner, Flow, Orchestrator, RunOptions, RunRequest, StepStatus};
use crate::shell::SystemExecutor;
use crate::ui::UserInterface;

use super::context::CommandContext;
use super::dispatcher::{Command, CommandResult};
use super::list::show_steps;

/// The install command implementation.
pub struct InstallCommand {
    ctx: CommandContext,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(ctx: &CommandContext, args: InstallArgs) -> Self {
        Self {
            ctx: ctx.clone(),
            args,
        }
    }

    /// The run request named by `--only` / `--from`.
    pub fn request(&self) -> RunRequest {
        match (&self.args.only, &self.args.from) {
            (Some(only), _) => RunRequest::Only(only.clone()),
            (None, Some(from)) => RunRequest::From(from.clone()),
            (None, None) => RunRequest::All,
        }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let loaded = self.ctx.load()?;

        if self.args.list {
            show_steps(ui, ExecutionPlanner::forward(&loaded.registry).view());
            return Ok(CommandResult::success());
        }

        self.ctx.require_root()?;
        let target = self.ctx.target_user()?;
        let settings = loaded.settings();

        let mut log = self.ctx.open_log(&loaded.manifest);
        log.line(&format!(
            "baseline {} install: manifest {}, target user {}",
            env!("CARGO_PKG_VERSION"),
            loaded.path.display(),
            target.name
        ));

        let options = RunOptions {
            request: self.request(),
            auto: self.args.auto,
            dry_run: false,
        };
        let mut executor = SystemExecutor;
        let report = Orchestrator::new(&loaded.registry, &settings, Some(&target)).run(
            Flow::Install,
            &options,
            &mut executor,
            ui,
            &mut log,
        )?;

        if let Some(failed) = report
            .ledger
            .entries()
            .iter()
            .find(|r| r.status == StepStatus::Failed)
        {
            ui.show_hint(&format!(
                "Retry a failed step with: baseline install --only {}",
                failed.id
            ));
        }
        if let Some(path) = log.path() {
            ui.show_hint(&format!("Log: {}", path.display()));
        }

        // Step failures are reported in the summary, not through the exit code.
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn command(args: InstallArgs) -> InstallCommand {
        InstallCommand::new(&CommandContext::new(PathBuf::from("/")), args)
    }

    #[test]
    fn request_from_flags() {
        assert_eq!(command(InstallArgs::default()).request(), RunRequest::All);

        let only = InstallArgs {
            only: Some("drivers".to_string()),
            ..Default::default()
        };
        assert_eq!(
            command(only).request(),
            RunRequest::Only("drivers".to_string())
        );

        let from = InstallArgs {
            from: Some("03".to_string()),
            ..Default::default()
        };
        assert_eq!(command(from).request(), RunRequest::From("03".to_string()));
    }

    #[test]
    fn list_flag_prints_steps_without_running() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("baseline.yml"),
            "steps:\n  - id: \"01\"\n    name: 01-headers\n    description: Kernel headers\n    principal: root\n    install: \"false\"\n",
        )
        .unwrap();
        let ctx = CommandContext::new(temp.path().to_path_buf());
        let args = InstallArgs {
            list: true,
            ..Default::default()
        };

        let mut ui = MockUI::new();
        let result = InstallCommand::new(&ctx, args).execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("01-headers"));
        assert!(ui.has_message("Kernel headers"));
        assert!(ui.spinners().is_empty());
        assert!(ui.summaries().is_empty());
    }
}
