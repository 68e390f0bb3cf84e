//! Manifest schema definitions.
//!
//! These structs map one-to-one onto the YAML step manifest. They are
//! deliberately loose (everything optional where YAML allows it); the
//! invariants are enforced when the manifest is turned into a
//! [`StepRegistry`](crate::steps::StepRegistry).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root structure of a step manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Global settings
    pub settings: Settings,

    /// Step definitions, in execution order
    pub steps: Vec<StepConfig>,
}

/// Global settings that apply to every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Append-only run log location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Interpreter used to run unit commands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,

    /// Command issued (as root) when the operator accepts a reboot gate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reboot_command: Option<String>,
}

/// A single step as written in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Ordinal key ("01", "02", ...)
    pub id: String,

    /// Display name, usually `<id>-<feature>`
    pub name: String,

    /// One-line description for `--list`
    #[serde(default)]
    pub description: String,

    /// Identity the units run under
    pub principal: PrincipalConfig,

    /// Whether a successful run should be followed by a reboot gate
    #[serde(default)]
    pub reboot: bool,

    /// Provisioning unit
    pub install: UnitConfig,

    /// Removal unit (steps without one are not part of the uninstall flow)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<UnitConfig>,

    /// Verification unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<UnitConfig>,
}

/// Principal as spelled in YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalConfig {
    Root,
    User,
    Dual,
}

/// A unit of work: either a bare command or explicit per-identity phases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitConfig {
    /// Shorthand: one command, run under the step's single principal.
    Command(String),
    /// Explicit phases.
    Phases(PhasesConfig),
}

/// Explicit per-identity commands of a unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhasesConfig {
    /// Command run as the unprivileged target user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Command run as root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Human description of the effect, shown by dry-run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}
