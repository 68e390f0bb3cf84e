//! Baseline - provision a fixed host baseline through ordered steps.
//!
//! Steps are declared in a YAML manifest. Each step has an ordinal id, a
//! principal (root, the unprivileged target user, or both in sequence) and
//! opaque install/remove/check units. Baseline decides which steps run, in
//! what order and under which identity, gates them interactively, and
//! reports the outcome.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Manifest loading and parsing
//! - [`error`] - Error types and result aliases
//! - [`logging`] - The append-only run log
//! - [`runner`] - Planning, gating, execution, and reporting
//! - [`shell`] - Process execution and host identity
//! - [`steps`] - Step descriptors and the registry
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use baseline::config::parse_manifest;
//! use baseline::steps::StepRegistry;
//! use std::path::Path;
//!
//! let yaml = r#"
//! steps:
//!   - id: "01"
//!     name: 01-kernel-headers
//!     principal: root
//!     install: apt-get install -y linux-headers-generic
//! "#;
//! let manifest = parse_manifest(yaml, Path::new("baseline.yml")).unwrap();
//! let registry = StepRegistry::from_manifest(&manifest).unwrap();
//! assert_eq!(registry.resolve("kernel").unwrap().id.as_str(), "01");
//! ```
//!
//! For file-based manifest loading, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{BaselineError, Result};
