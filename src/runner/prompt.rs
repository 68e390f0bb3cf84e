//! Per-step run/skip gating.

use crate::error::{BaselineError, Result};
use crate::steps::Step;
use crate::ui::{Prompt, UserInterface};

/// Gating state shared by every step of a run.
///
/// `AutoApprove` is fixed for the whole run. `SkipAllRemaining` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    Asking,
    AutoApprove,
    SkipAllRemaining,
}

/// What to do with the step in front of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Run,
    Skip,
}

/// One accepted answer to the step prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run,
    Skip,
    SkipAll,
}

/// Parse an answer to the `[Y/n/s]` step prompt.
///
/// Empty input means run. Anything unrecognised is `None`.
pub fn parse_choice(answer: &str) -> Option<Choice> {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Some(Choice::Run),
        "n" | "no" => Some(Choice::Skip),
        "s" | "skip" | "skip-all" => Some(Choice::SkipAll),
        _ => None,
    }
}

/// Prompt key for a step, e.g. `step.03`.
pub fn step_prompt_key(step: &Step) -> String {
    format!("step.{}", step.id)
}

/// Decides, step by step, whether planned steps run.
#[derive(Debug)]
pub struct PromptController {
    state: PromptState,
}

impl PromptController {
    pub fn new(auto: bool) -> Self {
        let state = if auto {
            PromptState::AutoApprove
        } else {
            PromptState::Asking
        };
        Self { state }
    }

    pub fn state(&self) -> PromptState {
        self.state
    }

    /// Gate `step`, asking through `ui` while in the `Asking` state.
    ///
    /// Invalid answers re-issue the same prompt. A headless UI cannot
    /// re-ask, so an invalid answer there is a usage error.
    pub fn decide(&mut self, step: &Step, ui: &mut dyn UserInterface) -> Result<Decision> {
        match self.state {
            PromptState::AutoApprove => return Ok(Decision::Run),
            PromptState::SkipAllRemaining => return Ok(Decision::Skip),
            PromptState::Asking => {}
        }

        let key = step_prompt_key(step);
        let question = format!("Run {}? [Y/n/s]", step.name);
        let prompt = Prompt::input(&key, &question, Some("y"));

        loop {
            let answer = ui.prompt(&prompt)?.as_string();
            match parse_choice(&answer) {
                Some(Choice::Run) => return Ok(Decision::Run),
                Some(Choice::Skip) => return Ok(Decision::Skip),
                Some(Choice::SkipAll) => {
                    tracing::debug!("skip-all chosen at step {}", step.id);
                    self.state = PromptState::SkipAllRemaining;
                    return Ok(Decision::Skip);
                }
                None if !ui.is_interactive() => {
                    return Err(BaselineError::Usage {
                        message: format!("invalid answer '{}' for {}", answer.trim(), key),
                    });
                }
                None => {
                    ui.warning(&format!(
                        "'{}' is not an answer: y(es), n(o) or s(kip all)",
                        answer.trim()
                    ));
                }
            }
        }
    }
}
