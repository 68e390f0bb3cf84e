//! Running a step's unit under the right identity.
//!
//! A unit is first turned into a list of [`Action`]s, one per phase. The
//! runner then either executes them in order or, in dry-run mode, renders
//! them without executing anything.

use std::time::Duration;

use tracing::warn;

use crate::error::{BaselineError, Result};
use crate::logging::RunLog;
use crate::shell::{CommandExecutor, Identity, Invocation, OutputLine, TargetUser};
use crate::steps::{Step, Unit};
use crate::ui::SpinnerHandle;

use super::ledger::StepStatus;

/// Placeholder shown for the target user in a dry run without one.
pub const UNRESOLVED_USER: &str = "<target user>";

/// One phase of a unit: a command and the identity it runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub identity: Identity,
    pub command: String,
}

impl Action {
    /// Human-readable form, e.g. `as alice: gsettings set ...`.
    pub fn render(&self) -> String {
        format!("as {}: {}", self.identity, self.command)
    }
}

/// Result of running one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutcome {
    pub status: StepStatus,
    /// Sum over the phases that ran.
    pub duration: Duration,
    /// The line printed instead of executing, in dry-run mode.
    pub rendered: Option<String>,
}

/// Invokes units under the principal their step declares.
pub struct PrincipalRunner<'a> {
    executor: &'a mut dyn CommandExecutor,
    shell: &'a str,
    target: Option<&'a TargetUser>,
    dry_run: bool,
}

impl<'a> PrincipalRunner<'a> {
    pub fn new(
        executor: &'a mut dyn CommandExecutor,
        shell: &'a str,
        target: Option<&'a TargetUser>,
    ) -> Self {
        Self {
            executor,
            shell,
            target,
            dry_run: false,
        }
    }

    /// Render actions instead of executing them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The phases of `unit`, user phase first.
    ///
    /// Without a resolved target user, a user phase is a privilege error,
    /// except in dry-run mode where it renders as a placeholder.
    pub fn actions(&self, step: &Step, unit: &Unit) -> Result<Vec<Action>> {
        let mut actions = Vec::new();

        if let Some(command) = &unit.user {
            let user = match self.target {
                Some(user) => user.clone(),
                None if self.dry_run => TargetUser::new(UNRESOLVED_USER, ""),
                None => {
                    return Err(BaselineError::Privilege {
                        message: format!(
                            "step '{}' runs as the target user, but none is set",
                            step.name
                        ),
                    })
                }
            };
            actions.push(Action {
                identity: Identity::User(user),
                command: command.clone(),
            });
        }
        if let Some(command) = &unit.root {
            actions.push(Action {
                identity: Identity::Root,
                command: command.clone(),
            });
        }

        Ok(actions)
    }

    /// Run `unit` for `step`.
    ///
    /// Phases run in order and stop at the first failure, so a root phase
    /// never runs on top of a failed user phase. Failures are returned as
    /// `StepStatus::Failed`, never as `Err`.
    pub fn run(
        &mut self,
        step: &Step,
        unit: &Unit,
        log: &mut RunLog,
        spinner: &mut dyn SpinnerHandle,
    ) -> Result<UnitOutcome> {
        let actions = self.actions(step, unit)?;

        if self.dry_run {
            let line = render_dry_run(step, unit, &actions);
            log.line(&format!("[dry-run] {}", line));
            return Ok(UnitOutcome {
                status: StepStatus::Ok,
                duration: Duration::ZERO,
                rendered: Some(line),
            });
        }

        let mut duration = Duration::ZERO;
        for action in &actions {
            let invocation = self.invocation(step, action);
            log.line(&format!("[{}] {}", step.id, action.render()));

            let result = {
                let mut on_line = |line: OutputLine| {
                    log.unit_output(step.id.as_str(), line.text());
                    spinner.output_line(line.text());
                };
                self.executor.run(&invocation, &mut on_line)
            };

            match result {
                Ok(result) => {
                    duration += result.duration;
                    if !result.success {
                        let code = result
                            .exit_code
                            .map_or_else(|| "signal".to_string(), |c| c.to_string());
                        log.line(&format!(
                            "[{}] {} phase exited with {}",
                            step.id, action.identity, code
                        ));
                        return Ok(UnitOutcome {
                            status: StepStatus::Failed,
                            duration,
                            rendered: None,
                        });
                    }
                }
                Err(e) => {
                    warn!("Step '{}' errored: {}", step.name, e);
                    log.line(&format!("[{}] {}", step.id, e));
                    return Ok(UnitOutcome {
                        status: StepStatus::Failed,
                        duration,
                        rendered: None,
                    });
                }
            }
        }

        Ok(UnitOutcome {
            status: StepStatus::Ok,
            duration,
            rendered: None,
        })
    }

    fn invocation(&self, step: &Step, action: &Action) -> Invocation {
        let mut invocation = Invocation::new(self.shell, action.identity.clone(), &action.command)
            .with_env("BASELINE_STEP_ID", step.id.as_str());
        if let Some(user) = self.target {
            invocation = invocation
                .with_env("TARGET_USER", user.name.as_str())
                .with_env("TARGET_HOME", user.home.to_string_lossy());
        }
        invocation
    }
}

/// The single descriptive line for a dry run: the declared effect if there
/// is one, otherwise the actions themselves.
fn render_dry_run(step: &Step, unit: &Unit, actions: &[Action]) -> String {
    let what = match &unit.effect {
        Some(effect) => format!("would {} (as {})", effect, step.principal),
        None => {
            let rendered: Vec<String> = actions.iter().map(Action::render).collect();
            format!("would run {}", rendered.join(", then "))
        }
    };
    format!("{}: {}", step.name, what)
}
