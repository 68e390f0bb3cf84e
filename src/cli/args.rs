//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Baseline - provision and remove a fixed host baseline, step by step.
#[derive(Debug, Parser)]
#[command(name = "baseline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Step manifest (default: ./baseline.yml, then /etc/baseline/steps.yml)
    #[arg(short, long, global = true, env = "BASELINE_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Append-only run log (overrides the manifest setting)
    #[arg(long, global = true, env = "BASELINE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Unprivileged target user (default: $SUDO_USER)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Stream unit output to the terminal
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print step status lines and the summary
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision the baseline, in step order
    Install(InstallArgs),

    /// Remove what install provisioned, in reverse step order
    Uninstall(UninstallArgs),

    /// Run each step's check and exit with the number of failures
    Verify(VerifyArgs),

    /// List the steps in the manifest
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallArgs {
    /// Run every step without prompting; reboot gates only print a note
    #[arg(long)]
    pub auto: bool,

    /// Run a single step (id, name, or part of a name)
    #[arg(long, value_name = "STEP", conflicts_with = "from")]
    pub only: Option<String>,

    /// Resume at a step and run everything after it
    #[arg(long, value_name = "STEP")]
    pub from: Option<String>,

    /// Print the steps and exit
    #[arg(short, long)]
    pub list: bool,
}

/// Arguments for the `uninstall` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UninstallArgs {
    /// Remove every step without prompting
    #[arg(long)]
    pub auto: bool,

    /// Remove a single step (id, name, or part of a name)
    #[arg(long, value_name = "STEP")]
    pub only: Option<String>,

    /// Print what would be removed without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the removable steps and exit
    #[arg(short, long)]
    pub list: bool,
}

/// Arguments for the `verify` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VerifyArgs {
    /// Check a single step (id, name, or part of a name)
    #[arg(long, value_name = "STEP")]
    pub only: Option<String>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the uninstall order (removable steps, last first)
    #[arg(long)]
    pub reverse: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
