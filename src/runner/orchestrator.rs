//! The run loop.
//!
//! For every planned step: gate it, run it under its principal, record the
//! outcome, and offer a reboot where the step asks for one. A failed step is
//! recorded and the loop moves on.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::{BaselineError, Result};
use crate::logging::RunLog;
use crate::shell::{CommandExecutor, Identity, Invocation, TargetUser, DEFAULT_SHELL};
use crate::steps::{Step, StepRegistry, Unit};
use crate::ui::{format_duration, BaselineTheme, UserInterface};

use super::ledger::{Ledger, StepResult, StepStatus};
use super::plan::{ExecutionPlanner, RunRequest};
use super::principal::PrincipalRunner;
use super::prompt::{Decision, PromptController};
use super::report::{reboot_gate, GateOutcome, RunSummary};

/// Default command issued when a reboot gate is accepted.
pub const DEFAULT_REBOOT_COMMAND: &str = "systemctl reboot";

/// Which unit of each step a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// `install` units, registry order, with reboot gates.
    Install,
    /// `remove` units, reverse order.
    Uninstall,
    /// `check` units, registry order, never prompted.
    Verify,
}

impl Flow {
    /// The unit this flow runs for `step`, if it has one.
    pub fn unit(self, step: &Step) -> Option<&Unit> {
        match self {
            Flow::Install => Some(&step.install),
            Flow::Uninstall => step.remove.as_ref(),
            Flow::Verify => step.check.as_ref(),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Flow::Install => "Installing",
            Flow::Uninstall => "Removing",
            Flow::Verify => "Checking",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Flow::Install => "Install",
            Flow::Uninstall => "Uninstall",
            Flow::Verify => "Verify",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title().to_lowercase())
    }
}

/// Per-invocation run options, derived from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub request: RunRequest,
    /// Suppress every prompt and bypass reboot gates.
    pub auto: bool,
    /// Render units instead of executing them (uninstall only).
    pub dry_run: bool,
}

/// Host settings a run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Interpreter for unit commands.
    pub shell: String,
    /// Issued as root when a reboot gate is accepted.
    pub reboot_command: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            reboot_command: DEFAULT_REBOOT_COMMAND.to_string(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub ledger: Ledger,
    pub summary: RunSummary,
    pub elapsed: Duration,
    /// A reboot gate was accepted and the reboot command issued.
    pub rebooted: bool,
}

/// Drives one run over a registry.
pub struct Orchestrator<'a> {
    registry: &'a StepRegistry,
    settings: &'a RunSettings,
    target: Option<&'a TargetUser>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        registry: &'a StepRegistry,
        settings: &'a RunSettings,
        target: Option<&'a TargetUser>,
    ) -> Self {
        Self {
            registry,
            settings,
            target,
        }
    }

    /// Plan and execute `flow`.
    ///
    /// Planning and privilege errors are returned before any step runs.
    /// Step failures are recorded in the ledger, not returned.
    pub fn run(
        &self,
        flow: Flow,
        options: &RunOptions,
        executor: &mut dyn CommandExecutor,
        ui: &mut dyn UserInterface,
        log: &mut RunLog,
    ) -> Result<RunReport> {
        let start = Instant::now();

        let planner = match flow {
            Flow::Uninstall => ExecutionPlanner::reverse(self.registry),
            Flow::Install | Flow::Verify => ExecutionPlanner::forward(self.registry),
        };
        let plan = planner.plan(&options.request)?;

        let dry_run = flow == Flow::Uninstall && options.dry_run;
        if !dry_run {
            self.check_target_user(flow, &plan)?;
        }

        let title = if dry_run {
            format!("{} (dry run)", flow.title())
        } else {
            flow.title().to_string()
        };
        let theme = BaselineTheme::detect();
        let mut gate = PromptController::new(options.auto || flow == Flow::Verify);
        let mut ledger = Ledger::new();
        let mut rebooted = false;

        ui.show_header(&title);
        info!("{} run: {} step(s) planned", flow, plan.len());
        log.line(&format!(
            "{} started: {} step(s) planned{}",
            flow,
            plan.len(),
            if dry_run { " (dry run)" } else { "" }
        ));

        let total = plan.len();
        for (index, step) in plan.iter().copied().enumerate() {
            ui.show_progress(index + 1, total);

            let Some(unit) = flow.unit(step) else {
                ui.message(&format!(
                    "  {}",
                    theme.format_skipped(&format!("{} (nothing to {})", step.name, flow))
                ));
                log.line(&format!("[{}] skipped: no {} unit", step.id, flow));
                ledger.record(StepResult::skipped(step))?;
                continue;
            };

            let decision = match gate.decide(step, ui) {
                Ok(decision) => decision,
                Err(e) => {
                    log.line(&format!("[{}] prompt failed: {}", step.id, e));
                    self.conclude(flow, &title, &ledger, start, dry_run, ui, log);
                    return Err(e);
                }
            };
            if decision == Decision::Skip {
                ui.message(&format!(
                    "  {}",
                    theme.format_skipped(&format!("{} skipped", step.name))
                ));
                log.line(&format!("[{}] skipped", step.id));
                ledger.record(StepResult::skipped(step))?;
                continue;
            }

            log.line(&format!("[{}] {} {}", step.id, flow.verb(), step.name));
            let mut spinner = ui.start_spinner(&format!("{} {}", flow.verb(), step.name));

            let outcome = PrincipalRunner::new(&mut *executor, &self.settings.shell, self.target)
                .dry_run(dry_run)
                .run(step, unit, log, spinner.as_mut())?;

            let took = format_duration(outcome.duration);
            match (&outcome.status, &outcome.rendered) {
                (_, Some(rendered)) => spinner.finish_success(rendered),
                (StepStatus::Ok, None) => {
                    spinner.finish_success(&format!("{} ({})", step.name, took));
                }
                _ => {
                    spinner.finish_error(&format!("{} failed ({})", step.name, took));
                    let err = BaselineError::StepExecution {
                        step: step.name.clone(),
                        message: format!("{} unit exited unsuccessfully", flow),
                    };
                    warn!("{}", err);
                }
            }
            log.line(&format!("[{}] {} ({})", step.id, outcome.status, took));

            ledger.record(StepResult::new(step, outcome.status, outcome.duration))?;

            if flow == Flow::Install && step.reboot && outcome.status == StepStatus::Ok {
                let next = self.registry.next_after(&step.id);
                if reboot_gate(step, next, options.auto, ui, log)? == GateOutcome::Reboot {
                    rebooted = true;
                    break;
                }
            }
        }

        let (summary, elapsed) = self.conclude(flow, &title, &ledger, start, dry_run, ui, log);

        if rebooted {
            self.reboot(executor, ui, log);
        }

        Ok(RunReport {
            ledger,
            summary,
            elapsed,
            rebooted,
        })
    }

    /// Show and log the summary of whatever the ledger holds so far.
    #[allow(clippy::too_many_arguments)]
    fn conclude(
        &self,
        flow: Flow,
        title: &str,
        ledger: &Ledger,
        start: Instant,
        dry_run: bool,
        ui: &mut dyn UserInterface,
        log: &mut RunLog,
    ) -> (RunSummary, Duration) {
        let elapsed = start.elapsed();
        let mut summary = RunSummary::from_ledger(title, ledger, elapsed);
        if dry_run || flow == Flow::Verify {
            summary = summary.without_reboot();
        }
        ui.show_run_summary(&summary);
        log.line(&format!(
            "{} finished: {} in {}",
            flow,
            summary.totals_line(),
            format_duration(elapsed)
        ));
        (summary, elapsed)
    }

    /// Fail before any step runs if a planned unit needs a target user
    /// that was never resolved.
    fn check_target_user(&self, flow: Flow, plan: &[&Step]) -> Result<()> {
        if self.target.is_some() {
            return Ok(());
        }
        let needy = plan
            .iter()
            .find(|s| flow.unit(s).is_some_and(|u| u.user.is_some()));
        match needy {
            Some(step) => Err(BaselineError::Privilege {
                message: format!(
                    "step '{}' runs as the target user: run through sudo or pass --user <name>",
                    step.name
                ),
            }),
            None => Ok(()),
        }
    }

    fn reboot(&self, executor: &mut dyn CommandExecutor, ui: &mut dyn UserInterface, log: &mut RunLog) {
        let command = &self.settings.reboot_command;
        log.line(&format!("rebooting: {}", command));
        ui.message(&format!("Rebooting ({})...", command));

        let invocation = Invocation::new(&self.settings.shell, Identity::Root, command);
        match executor.run(&invocation, &mut |_| {}) {
            Ok(result) if result.success => {}
            Ok(result) => {
                let err = BaselineError::CommandFailed {
                    command: command.clone(),
                    code: result.exit_code,
                };
                ui.error(&err.to_string());
                log.line(&err.to_string());
            }
            Err(e) => {
                ui.error(&e.to_string());
                log.line(&e.to_string());
            }
        }
    }
}
