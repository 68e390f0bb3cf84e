//! Append-only run log.
//!
//! Every line is prefixed with a local timestamp, `[YYYY-MM-DD HH:MM:SS]`.
//! The log is the only state that outlives a run; it is never read back.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;

/// Default log location when neither flag, env, nor manifest names one.
pub const DEFAULT_LOG_FILE: &str = "/var/log/baseline.log";

/// Timestamp format used for every log line.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only sink for timestamped progress and unit output lines.
#[derive(Debug)]
pub struct RunLog {
    path: Option<PathBuf>,
    file: Option<File>,
}

impl RunLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            file: Some(file),
        })
    }

    /// Open `path`, falling back to a disabled log with a warning.
    pub fn open_or_disabled(path: &Path) -> Self {
        match Self::open(path) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("Cannot open run log {}: {}", path.display(), e);
                Self::disabled()
            }
        }
    }

    /// A log that discards everything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            file: None,
        }
    }

    /// Location of the log file, if enabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one orchestrator-level line.
    pub fn line(&mut self, msg: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let stamp = Local::now().format(TIMESTAMP_FORMAT);
        for text in msg.lines() {
            if let Err(e) = writeln!(file, "[{}] {}", stamp, text) {
                tracing::warn!("Run log write failed, disabling: {}", e);
                self.file = None;
                return;
            }
        }
    }

    /// Append one line of unit output, tagged with the step id.
    pub fn unit_output(&mut self, step_id: &str, text: &str) {
        self.line(&format!("[{}] {}", step_id, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn is_timestamped(line: &str) -> bool {
        // "[2026-01-02 03:04:05] ..."
        line.len() > 22 && line.as_bytes()[0] == b'[' && line.as_bytes()[20] == b']'
    }

    #[test]
    fn appends_timestamped_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.log");

        let mut log = RunLog::open(&path).unwrap();
        log.line("run started");
        log.unit_output("03", "compiling module");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| is_timestamped(l)));
        assert!(lines[0].ends_with("run started"));
        assert!(lines[1].ends_with("[03] compiling module"));
    }

    #[test]
    fn reopening_appends_instead_of_truncating() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.log");

        RunLog::open(&path).unwrap().line("first");
        RunLog::open(&path).unwrap().line("second");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("first"));
        assert!(content.contains("second"));
    }

    #[test]
    fn multi_line_messages_are_stamped_per_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("run.log");

        RunLog::open(&path).unwrap().line("a\nb");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().filter(|l| is_timestamped(l)).count(), 2);
    }

    #[test]
    fn creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/run.log");
        let log = RunLog::open(&path).unwrap();
        assert_eq!(log.path(), Some(path.as_path()));
        assert!(path.exists());
    }

    #[test]
    fn disabled_log_discards() {
        let mut log = RunLog::disabled();
        log.line("nothing");
        assert!(log.path().is_none());
    }

    #[test]
    fn open_or_disabled_falls_back() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be opened as a log file.
        let log = RunLog::open_or_disabled(temp.path());
        assert!(log.path().is_none());
    }
}
