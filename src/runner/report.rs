//! End-of-run summary and the reboot gate.

use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::logging::RunLog;
use crate::steps::Step;
use crate::ui::{format_duration, Align, BaselineTheme, Cell, Prompt, Table, UserInterface};

use super::ledger::{as_seconds, Ledger, StepResult, StepStatus};

/// Prompt key of the reboot gate.
pub const REBOOT_PROMPT_KEY: &str = "reboot";

/// Tabulated outcome of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub title: String,
    pub rows: Vec<StepResult>,
    pub ok: usize,
    pub failed: usize,
    pub skipped: usize,
    #[serde(rename = "total_seconds", serialize_with = "as_seconds")]
    pub total_duration: Duration,
    pub reboot_recommended: bool,
}

/// Status cell styled by outcome.
fn status_cell(status: StepStatus, theme: &BaselineTheme) -> Cell {
    let style = match status {
        StepStatus::Ok => &theme.success,
        StepStatus::Failed => &theme.error,
        StepStatus::Skipped => &theme.dim,
    };
    Cell::styled(status.to_string(), style)
}

impl RunSummary {
    pub fn from_ledger(title: &str, ledger: &Ledger, elapsed: Duration) -> Self {
        Self {
            title: title.to_string(),
            rows: ledger.entries().to_vec(),
            ok: ledger.count(StepStatus::Ok),
            failed: ledger.count(StepStatus::Failed),
            skipped: ledger.count(StepStatus::Skipped),
            total_duration: elapsed,
            reboot_recommended: ledger.reboot_recommended(),
        }
    }

    /// Drop the reboot recommendation, for runs that changed nothing
    /// (verify, dry runs).
    pub fn without_reboot(mut self) -> Self {
        self.reboot_recommended = false;
        self
    }

    /// `Ok=3, Failed=1, Skipped=4`
    pub fn totals_line(&self) -> String {
        format!(
            "Ok={}, Failed={}, Skipped={}",
            self.ok, self.failed, self.skipped
        )
    }

    /// Render the summary block.
    pub fn render(&self, theme: &BaselineTheme) -> String {
        let mut out = theme.format_header(&self.title);
        out.push('\n');

        if self.rows.is_empty() {
            out.push_str(&theme.dim.apply_to("No steps planned.").to_string());
            out.push('\n');
        } else {
            let mut table = Table::new(&["Step", "Status", "Duration"]).align(2, Align::Right);
            for row in &self.rows {
                table.add_row([
                    Cell::plain(row.name.as_str()),
                    status_cell(row.status, theme),
                    Cell::styled(format_duration(row.duration), &theme.duration),
                ]);
            }
            out.push_str(&table.render(theme));
            out.push('\n');
        }

        let totals = self.totals_line();
        let totals = if self.failed > 0 {
            theme.error.apply_to(totals).to_string()
        } else {
            theme.success.apply_to(totals).to_string()
        };
        out.push_str(&totals);
        out.push('\n');
        out.push_str(&format!(
            "Total time: {}",
            theme.duration.apply_to(format_duration(self.total_duration))
        ));

        if self.reboot_recommended {
            out.push('\n');
            out.push_str(&theme.format_warning("Reboot recommended"));
        }

        out
    }
}

/// What the run does after a reboot gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Keep going with the next planned step.
    Continue,
    /// Stop the run and reboot the host.
    Reboot,
}

/// The `--from` command that resumes after `step`, if any step follows it.
pub fn resume_hint(next: Option<&Step>) -> String {
    match next {
        Some(step) => format!("Resume with: baseline install --from {}", step.id),
        None => "No steps remain after the reboot.".to_string(),
    }
}

/// Offer a reboot after a reboot-flagged `step` succeeded.
///
/// `next` is the registry successor of `step`, used for the resume hint.
/// In auto mode the gate only prints a note.
pub fn reboot_gate(
    step: &Step,
    next: Option<&Step>,
    auto: bool,
    ui: &mut dyn UserInterface,
    log: &mut RunLog,
) -> Result<GateOutcome> {
    if auto {
        ui.show_hint(&format!(
            "{} asks for a reboot; not rebooting in --auto mode",
            step.name
        ));
        log.line(&format!("reboot gate after {}: bypassed (--auto)", step.id));
        return Ok(GateOutcome::Continue);
    }

    let prompt = Prompt::confirm(
        REBOOT_PROMPT_KEY,
        &format!("{} needs a reboot to take effect. Reboot now?", step.name),
        false,
    );
    let accepted = ui.prompt(&prompt)?.as_bool().unwrap_or(false);

    if accepted {
        let hint = resume_hint(next);
        ui.message(&hint);
        log.line(&format!("reboot gate after {}: accepted", step.id));
        log.line(&hint);
        Ok(GateOutcome::Reboot)
    } else {
        ui.warning(&format!(
            "Reboot postponed; reboot before relying on {}",
            step.name
        ));
        log.line(&format!("reboot gate after {}: declined", step.id));
        Ok(GateOutcome::Continue)
    }
}
