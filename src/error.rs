//! Error types for baseline operations.
//!
//! This module defines [`BaselineError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Precondition failures (`Usage`, `Privilege`, `NotFound`, manifest
//!   errors) are fatal for the invocation and surface as exit code 1
//! - A unit exiting nonzero is never an `Err`: it is recorded as a failed
//!   step and the run continues
//! - Use `anyhow::Error` (via `BaselineError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for baseline operations.
#[derive(Debug, Error)]
pub enum BaselineError {
    /// Bad or missing flag value.
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// Not running privileged, or no resolvable target user.
    #[error("Insufficient privilege: {message}")]
    Privilege { message: String },

    /// A step reference resolved to nothing.
    #[error("No step matches '{reference}'")]
    NotFound { reference: String },

    /// A step's unit exited nonzero.
    #[error("Step '{step}' failed: {message}")]
    StepExecution { step: String, message: String },

    /// No manifest at any of the searched locations.
    #[error("Step manifest not found (searched: {searched})")]
    ManifestNotFound { searched: String },

    /// Manifest is not valid YAML or does not match the schema.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// Manifest parsed but violates a registry invariant.
    #[error("Invalid manifest: {message}")]
    ManifestInvalid { message: String },

    /// A second result was recorded for the same step within one run.
    #[error("Result for step '{id}' already recorded in this run")]
    LedgerConflict { id: String },

    /// A unit could not be spawned or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for baseline operations.
pub type Result<T> = std::result::Result<T, BaselineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_reference() {
        let err = BaselineError::NotFound {
            reference: "bluetooth".into(),
        };
        assert!(err.to_string().contains("bluetooth"));
    }

    #[test]
    fn privilege_error_displays_message() {
        let err = BaselineError::Privilege {
            message: "must run as root".into(),
        };
        assert!(err.to_string().contains("must run as root"));
    }

    #[test]
    fn manifest_parse_error_displays_path_and_message() {
        let err = BaselineError::ManifestParse {
            path: PathBuf::from("/etc/baseline/steps.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/baseline/steps.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn step_execution_error_displays_step_and_message() {
        let err = BaselineError::StepExecution {
            step: "04-firewall".into(),
            message: "exit code 3".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("04-firewall"));
        assert!(msg.contains("exit code 3"));
    }

    #[test]
    fn ledger_conflict_displays_id() {
        let err = BaselineError::LedgerConflict { id: "02".into() };
        assert!(err.to_string().contains("'02'"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: BaselineError = io_err.into();
        assert!(matches!(err, BaselineError::Io(_)));
    }
}
