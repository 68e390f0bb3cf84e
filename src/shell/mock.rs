//! Scripted executor for testing.
//!
//! `ScriptedExecutor` implements [`CommandExecutor`] without spawning
//! anything. Every invocation is recorded; commands succeed unless told
//! otherwise.
//!
//! # Example
//!
//! ```
//! use baseline::shell::{CommandExecutor, Identity, Invocation, ScriptedExecutor};
//!
//! let mut exec = ScriptedExecutor::new();
//! exec.fail("modprobe hid_apple", 1);
//!
//! let inv = Invocation::new("/bin/bash", Identity::Root, "modprobe hid_apple");
//! let result = exec.run(&inv, &mut |_| {}).unwrap();
//!
//! assert!(!result.success);
//! assert_eq!(exec.commands(), vec!["modprobe hid_apple"]);
//! ```

use std::collections::HashMap;
use std::time::Duration;

use crate::error::Result;

use super::command::{CommandExecutor, CommandResult, Invocation, OutputLine};

/// Executor double that returns scripted exit codes.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    exit_codes: HashMap<String, i32>,
    outputs: HashMap<String, Vec<String>>,
    duration: Duration,
    invocations: Vec<Invocation>,
}

impl ScriptedExecutor {
    /// Create an executor where every command succeeds instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `command` exit with `code`.
    pub fn fail(&mut self, command: &str, code: i32) {
        self.exit_codes.insert(command.to_string(), code);
    }

    /// Make `command` print `lines` on stdout.
    pub fn set_output(&mut self, command: &str, lines: &[&str]) {
        self.outputs.insert(
            command.to_string(),
            lines.iter().map(|s| s.to_string()).collect(),
        );
    }

    /// Report this duration for every invocation.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// All invocations, in the order they were run.
    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// The unit commands that were run, in order.
    pub fn commands(&self) -> Vec<&str> {
        self.invocations.iter().map(|i| i.command.as_str()).collect()
    }

    /// Whether `command` was ever run.
    pub fn ran(&self, command: &str) -> bool {
        self.invocations.iter().any(|i| i.command == command)
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn run(
        &mut self,
        invocation: &Invocation,
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<CommandResult> {
        self.invocations.push(invocation.clone());

        if let Some(lines) = self.outputs.get(&invocation.command) {
            for line in lines {
                on_line(OutputLine::Stdout(line.clone()));
            }
        }

        match self.exit_codes.get(&invocation.command) {
            Some(&code) if code != 0 => Ok(CommandResult::failure(Some(code), self.duration)),
            _ => Ok(CommandResult::success(self.duration)),
        }
    }
}
