//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::time::Duration;

use super::theme::BaselineTheme;
use super::SpinnerHandle;

/// Number of recent unit output lines shown under a spinner.
const LIVE_LINES: usize = 2;

/// Longest unit output line shown under a spinner before truncation.
const LIVE_LINE_WIDTH: usize = 72;

/// A spinner for a running step.
///
/// In verbose mode every unit output line is printed above the spinner;
/// otherwise the last few lines are shown dimmed beneath its message.
pub struct ProgressSpinner {
    bar: ProgressBar,
    base_message: String,
    live: VecDeque<String>,
    stream: bool,
    theme: BaselineTheme,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str, stream: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("  {spinner:.magenta} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            base_message: message.to_string(),
            live: VecDeque::new(),
            stream,
            theme: BaselineTheme::detect(),
        }
    }

    /// Create a spinner that doesn't draw.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            base_message: String::new(),
            live: VecDeque::new(),
            stream: false,
            theme: BaselineTheme::plain(),
        }
    }

    /// The message currently shown (base message plus live lines).
    pub fn message(&self) -> String {
        self.bar.message()
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.base_message = msg.to_string();
        self.bar.set_message(msg.to_string());
    }

    fn output_line(&mut self, line: &str) {
        let text = line.trim_end();
        if text.is_empty() {
            return;
        }
        if self.stream {
            self.bar.println(format!("    {}", text));
            return;
        }

        let shown = if text.chars().count() > LIVE_LINE_WIDTH {
            let cut: String = text.chars().take(LIVE_LINE_WIDTH - 3).collect();
            format!("{}...", cut)
        } else {
            text.to_string()
        };
        self.live.push_back(shown);
        while self.live.len() > LIVE_LINES {
            self.live.pop_front();
        }

        let mut msg = self.base_message.clone();
        for l in &self.live {
            msg.push_str("\n    ");
            msg.push_str(&self.theme.dim.apply_to(format!("» {}", l)).to_string());
        }
        self.bar.set_message(msg);
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }
}
