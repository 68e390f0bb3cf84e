//! Non-interactive UI for headless runs.

use std::collections::HashMap;

use crate::error::{BaselineError, Result};
use crate::runner::RunSummary;

use super::theme::BaselineTheme;
use super::{OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts in headless runs.
pub const PROMPT_ENV_PREFIX: &str = "BASELINE_PROMPT_";

/// Environment variable that answers the prompt with `key`.
///
/// Non-alphanumeric characters become `_`: the prompt `step.03` is
/// answered by `BASELINE_PROMPT_STEP_03`.
pub fn prompt_env_key(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", PROMPT_ENV_PREFIX, sanitized)
}

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `BASELINE_PROMPT_*` environment variables,
/// then from the prompt's default. Output is uncolored.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
    theme: BaselineTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self::with_overrides(mode, env_overrides)
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
            theme: BaselineTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("{}", self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let answer = self
            .env_overrides
            .get(&prompt_env_key(&prompt.key))
            .or(prompt.default.as_ref())
            .cloned()
            .ok_or_else(|| BaselineError::Usage {
                message: format!(
                    "cannot prompt for '{}' without a terminal (use --auto or set {})",
                    prompt.key,
                    prompt_env_key(&prompt.key)
                ),
            })?;

        match prompt.prompt_type {
            PromptType::Confirm => Ok(PromptResult::Bool(
                super::parse_yes_no(&answer).unwrap_or(false),
            )),
            PromptType::Input => Ok(PromptResult::String(answer)),
        }
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        println!("  {}", message);
        Box::new(LineSpinner {
            stream: self.mode.shows_command_output(),
            theme: self.theme.clone(),
        })
    }

    fn show_header(&mut self, title: &str) {
        println!("\n{}\n", self.theme.format_header(title));
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        println!("[{}/{}]", current, total);
    }

    fn show_hint(&mut self, hint: &str) {
        println!("  {}", hint);
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        println!();
        println!("{}", summary.render(&self.theme));
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Line-oriented stand-in for a spinner.
struct LineSpinner {
    stream: bool,
    theme: BaselineTheme,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn output_line(&mut self, line: &str) {
        if self.stream {
            println!("    {}", line);
        }
    }

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_is_not_interactive() {
        let ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        assert!(!ui.is_interactive());
    }

    #[test]
    fn prompt_env_key_sanitizes() {
        assert_eq!(prompt_env_key("step.03"), "BASELINE_PROMPT_STEP_03");
        assert_eq!(prompt_env_key("reboot"), "BASELINE_PROMPT_REBOOT");
    }

    #[test]
    fn prompt_uses_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        let prompt = Prompt::input("step.01", "Run?", Some("y"));
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "y");
    }

    #[test]
    fn prompt_fails_without_default() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        let prompt = Prompt::input("step.01", "Run?", None);
        let err = ui.prompt(&prompt).unwrap_err();
        assert!(matches!(err, BaselineError::Usage { .. }));
    }

    #[test]
    fn prompt_uses_env_override() {
        let mut overrides = HashMap::new();
        overrides.insert("BASELINE_PROMPT_STEP_02".to_string(), "s".to_string());

        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);
        let prompt = Prompt::input("step.02", "Run?", Some("y"));
        assert_eq!(ui.prompt(&prompt).unwrap().as_string(), "s");
    }

    #[test]
    fn confirm_reads_override_as_bool() {
        let mut overrides = HashMap::new();
        overrides.insert("BASELINE_PROMPT_REBOOT".to_string(), "yes".to_string());

        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, overrides);
        let prompt = Prompt::confirm("reboot", "Reboot now?", false);
        assert_eq!(ui.prompt(&prompt).unwrap(), PromptResult::Bool(true));
    }

    #[test]
    fn confirm_default_false() {
        let mut ui = NonInteractiveUI::with_overrides(OutputMode::Normal, HashMap::new());
        let prompt = Prompt::confirm("reboot", "Reboot now?", false);
        assert_eq!(ui.prompt(&prompt).unwrap(), PromptResult::Bool(false));
    }
}
