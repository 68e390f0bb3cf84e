//! Interactive terminal UI.

use console::Term;
use std::io::{IsTerminal, Write};

use crate::error::Result;
use crate::runner::RunSummary;

use super::{
    prompt_user, BaselineTheme, NonInteractiveUI, OutputMode, ProgressSpinner, Prompt,
    PromptResult, SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: BaselineTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            theme: BaselineTheme::detect(),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(
                message,
                self.mode.shows_command_output(),
            ))
        } else {
            Box::new(StatusOnlySpinner {
                theme: self.theme.clone(),
            })
        }
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        writeln!(
            self.term,
            "{}",
            self.theme.dim.apply_to(format!("[{}/{}]", current, total))
        )
        .ok();
    }

    fn show_hint(&mut self, hint: &str) {
        writeln!(self.term, "  {}", self.theme.hint.apply_to(hint)).ok();
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        writeln!(self.term).ok();
        writeln!(self.term, "{}", summary.render(&self.theme)).ok();
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Quiet-mode spinner: no animation, only the final status line.
struct StatusOnlySpinner {
    theme: BaselineTheme,
}

impl SpinnerHandle for StatusOnlySpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn output_line(&mut self, _line: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("  {}", self.theme.format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        println!("  {}", self.theme.format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("  {}", self.theme.format_skipped(msg));
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() && std::io::stdin().is_terminal() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
