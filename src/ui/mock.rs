//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use baseline::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.queue_prompt_responses("step.01", vec!["maybe", "n"]);
//!
//! let prompt = Prompt::input("step.01", "Run 01-headers?", None);
//! assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "maybe");
//! assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "n");
//! assert_eq!(ui.prompts_shown(), &["step.01", "step.01"]);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::Result;
use crate::runner::RunSummary;

use super::{
    parse_yes_no, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface,
};

/// Status of a mock spinner when finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    /// Finished successfully.
    Success,
    /// Finished with error.
    Error,
    /// Finished as skipped.
    Skipped,
}

type SpinnerLog = Rc<RefCell<Vec<(SpinnerStatus, String)>>>;

/// Mock UI implementation for testing.
///
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked multiple times.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    hints: Vec<String>,
    progress: Vec<(usize, usize)>,
    spinners: Vec<String>,
    spinner_output: Rc<RefCell<Vec<String>>>,
    finished: SpinnerLog,
    summaries: Vec<RunSummary>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
    /// Fallback response for any prompt key not otherwise configured.
    default_prompt_response: Option<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            interactive: true,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::new()
        }
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// Responses are returned in order. After the queue is exhausted,
    /// falls back to `set_prompt_response` or defaults.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    /// Set a default response for any prompt key not explicitly configured.
    pub fn set_default_prompt_response(&mut self, response: &str) {
        self.default_prompt_response = Some(response.to_string());
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    /// Get all captured messages.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Get all captured success messages.
    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    /// Get all captured warning messages.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured error messages.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Get all captured headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get all captured hints.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Get all captured progress updates.
    pub fn progress(&self) -> &[(usize, usize)] {
        &self.progress
    }

    /// Get all spinner messages that were started.
    pub fn spinners(&self) -> &[String] {
        &self.spinners
    }

    /// Unit output lines fed to spinners, in order.
    pub fn spinner_output(&self) -> Vec<String> {
        self.spinner_output.borrow().clone()
    }

    /// How each spinner finished, in order.
    pub fn spinner_finishes(&self) -> Vec<(SpinnerStatus, String)> {
        self.finished.borrow().clone()
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Get all captured run summaries.
    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific hint was shown.
    pub fn has_hint(&self, msg: &str) -> bool {
        self.hints.iter().any(|m| m.contains(msg))
    }

    fn next_response(&mut self, prompt: &Prompt) -> Option<String> {
        if let Some(response) = self
            .prompt_queues
            .get_mut(&prompt.key)
            .and_then(VecDeque::pop_front)
        {
            return Some(response);
        }
        self.prompt_responses
            .get(&prompt.key)
            .or(self.default_prompt_response.as_ref())
            .or(prompt.default.as_ref())
            .cloned()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());
        let response = self.next_response(prompt).unwrap_or_default();

        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(
                parse_yes_no(&response).unwrap_or(false),
            )),
            PromptType::Input => Ok(PromptResult::String(response)),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.spinners.push(message.to_string());
        Box::new(MockSpinner {
            output: Rc::clone(&self.spinner_output),
            finished: Rc::clone(&self.finished),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        self.progress.push((current, total));
    }

    fn show_hint(&mut self, hint: &str) {
        self.hints.push(hint.to_string());
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Mock spinner that reports back to its [`MockUI`].
#[derive(Debug)]
pub struct MockSpinner {
    output: Rc<RefCell<Vec<String>>>,
    finished: SpinnerLog,
}

impl MockSpinner {
    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        self.finished.borrow_mut().push((status, msg.to_string()));
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn output_line(&mut self, line: &str) {
        self.output.borrow_mut().push(line.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}
