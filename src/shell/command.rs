//! Unit invocation: building the process for an identity and running it.

use crate::error::{BaselineError, Result};
use std::fmt;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::platform::TargetUser;

/// Default interpreter for unit commands.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Result of executing a unit command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, duration: Duration) -> Self {
        Self {
            exit_code,
            duration,
            success: false,
        }
    }
}

/// Output line from command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    pub fn text(&self) -> &str {
        match self {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s,
        }
    }
}

/// Who a command runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Root,
    User(TargetUser),
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Root => f.write_str("root"),
            Identity::User(user) => f.write_str(&user.name),
        }
    }
}

/// A fully specified process to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Identity the command runs as.
    pub identity: Identity,
    /// The unit command, as written in the manifest.
    pub command: String,
    /// Program to execute.
    pub program: String,
    /// Arguments to `program`.
    pub args: Vec<String>,
    /// Extra environment for the child.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Build the invocation of `command` under `identity`.
    ///
    /// Root runs `<shell> -c <command>` directly. A target user runs
    /// `sudo -u <name> -H -- env <shell> -c <command>` so that files it
    /// creates are owned by, and visible to, that user's session.
    pub fn new(shell: &str, identity: Identity, command: &str) -> Self {
        let (program, args) = match &identity {
            Identity::Root => (
                shell.to_string(),
                vec!["-c".to_string(), command.to_string()],
            ),
            Identity::User(user) => (
                "sudo".to_string(),
                vec![
                    "-u".to_string(),
                    user.name.clone(),
                    "-H".to_string(),
                    "--".to_string(),
                    "env".to_string(),
                    shell.to_string(),
                    "-c".to_string(),
                    command.to_string(),
                ],
            ),
        };

        Self {
            identity,
            command: command.to_string(),
            program,
            args,
            env: Vec::new(),
        }
    }

    /// Add an environment variable for the child.
    ///
    /// sudo resets the environment, so for a target user the variable is
    /// also passed to `env` as `KEY=VALUE`, ahead of `<shell> -c <command>`.
    pub fn with_env(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if matches!(self.identity, Identity::User(_)) {
            let at = self.args.len().saturating_sub(3);
            self.args.insert(at, format!("{}={}", key, value));
        }
        self.env.push((key.to_string(), value));
        self
    }

    /// Render as a single shell-like line (for logs and dry-run).
    pub fn display_line(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
    }
}

/// Runs invocations to completion.
///
/// The process-backed implementation is [`SystemExecutor`]; tests use
/// [`ScriptedExecutor`](super::ScriptedExecutor).
pub trait CommandExecutor {
    /// Run `invocation`, feeding every output line to `on_line`, and block
    /// until it exits.
    fn run(
        &mut self,
        invocation: &Invocation,
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<CommandResult>;
}

/// Executes invocations as real child processes.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(
        &mut self,
        invocation: &Invocation,
        on_line: &mut dyn FnMut(OutputLine),
    ) -> Result<CommandResult> {
        execute_streaming(invocation, on_line)
    }
}

/// Execute an invocation with streaming output.
///
/// Stdout and stderr are read on helper threads and delivered to
/// `on_line` on the calling thread, in arrival order.
pub fn execute_streaming(
    invocation: &Invocation,
    on_line: &mut dyn FnMut(OutputLine),
) -> Result<CommandResult> {
    let start = Instant::now();
    let spawn_failed = || BaselineError::CommandFailed {
        command: invocation.display_line(),
        code: None,
    };

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|_| spawn_failed())?;

    let stdout = child.stdout.take().ok_or_else(spawn_failed)?;
    let stderr = child.stderr.take().ok_or_else(spawn_failed)?;

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        for line in reader.lines().map_while(std::result::Result::ok) {
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        for line in reader.lines().map_while(std::result::Result::ok) {
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
    });

    for line in rx {
        on_line(line);
    }

    let _ = stdout_handle.join();
    let _ = stderr_handle.join();

    let status = child.wait().map_err(|_| spawn_failed())?;
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(duration))
    } else {
        Ok(CommandResult::failure(status.code(), duration))
    }
}
