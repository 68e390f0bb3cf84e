//! Per-run record of step outcomes.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::{BaselineError, Result};
use crate::steps::{Step, StepId};

/// Final status of a planned step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepStatus {
    Ok,
    Failed,
    Skipped,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Ok => "Ok",
            StepStatus::Failed => "Failed",
            StepStatus::Skipped => "Skipped",
        };
        f.write_str(s)
    }
}

/// Outcome of one step in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    pub id: StepId,
    pub name: String,
    pub status: StepStatus,
    #[serde(rename = "duration_seconds", serialize_with = "as_seconds")]
    pub duration: Duration,
    /// Copied from the step so the ledger alone can tell whether a reboot is due.
    pub reboot: bool,
}

/// Serialize a duration as fractional seconds.
pub(crate) fn as_seconds<S: serde::Serializer>(
    d: &Duration,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl StepResult {
    pub fn new(step: &Step, status: StepStatus, duration: Duration) -> Self {
        Self {
            id: step.id.clone(),
            name: step.name.clone(),
            status,
            duration,
            reboot: step.reboot,
        }
    }

    pub fn skipped(step: &Step) -> Self {
        Self::new(step, StepStatus::Skipped, Duration::ZERO)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

/// Ordered, append-only mapping of step id to result.
///
/// Entries keep the order they were recorded in, which is plan order.
/// An id can be recorded at most once.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<StepResult>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result. Recording the same id twice is an error.
    pub fn record(&mut self, result: StepResult) -> Result<()> {
        if self.get(&result.id).is_some() {
            return Err(BaselineError::LedgerConflict {
                id: result.id.to_string(),
            });
        }
        tracing::debug!("ledger: {} -> {}", result.id, result.status);
        self.entries.push(result);
        Ok(())
    }

    pub fn get(&self, id: &StepId) -> Option<&StepResult> {
        self.entries.iter().find(|r| &r.id == id)
    }

    pub fn entries(&self) -> &[StepResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with `status`.
    pub fn count(&self, status: StepStatus) -> usize {
        self.entries.iter().filter(|r| r.status == status).count()
    }

    /// `(id, status)` pairs in recorded order.
    pub fn statuses(&self) -> Vec<(StepId, StepStatus)> {
        self.entries
            .iter()
            .map(|r| (r.id.clone(), r.status))
            .collect()
    }

    /// True iff some reboot-flagged step finished `Ok`.
    pub fn reboot_recommended(&self) -> bool {
        self.entries
            .iter()
            .any(|r| r.reboot && r.status == StepStatus::Ok)
    }
}
