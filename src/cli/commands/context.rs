//! Shared setup for commands: manifest, settings, log, and identity.

use std::path::{Path, PathBuf};

use crate::cli::args::Cli;
use crate::config::{load_manifest, Manifest, ManifestPaths};
use crate::error::{BaselineError, Result};
use crate::logging::{RunLog, DEFAULT_LOG_FILE};
use crate::runner::RunSettings;
use crate::shell::{is_elevated, resolve_target_user, TargetUser};
use crate::steps::StepRegistry;

/// Global options every command sees.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    cwd: PathBuf,
    manifest: Option<PathBuf>,
    log_file: Option<PathBuf>,
    user: Option<String>,
}

/// A manifest loaded and validated into a registry.
#[derive(Debug)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
    pub registry: StepRegistry,
}

impl LoadedManifest {
    /// Shell and reboot command, manifest values over defaults.
    pub fn settings(&self) -> RunSettings {
        let defaults = RunSettings::default();
        let settings = &self.manifest.settings;
        RunSettings {
            shell: settings.shell.clone().unwrap_or(defaults.shell),
            reboot_command: settings
                .reboot_command
                .clone()
                .unwrap_or(defaults.reboot_command),
        }
    }
}

impl CommandContext {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    pub fn from_cli(cli: &Cli, cwd: PathBuf) -> Self {
        Self {
            cwd,
            manifest: cli.manifest.clone(),
            log_file: cli.log_file.clone(),
            user: cli.user.clone(),
        }
    }

    pub fn with_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Discover, parse, and validate the step manifest.
    pub fn load(&self) -> Result<LoadedManifest> {
        let paths = ManifestPaths::discover(self.manifest.as_deref(), &self.cwd);
        let (path, manifest) = load_manifest(&paths)?;
        let registry = StepRegistry::from_manifest(&manifest)?;
        tracing::debug!(
            "Loaded {} step(s) from {}",
            registry.len(),
            path.display()
        );
        Ok(LoadedManifest {
            path,
            manifest,
            registry,
        })
    }

    /// Log location: flag or env, then manifest, then the default.
    pub fn log_path(&self, manifest: &Manifest) -> PathBuf {
        self.log_file
            .clone()
            .or_else(|| manifest.settings.log_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    pub fn open_log(&self, manifest: &Manifest) -> RunLog {
        RunLog::open_or_disabled(&self.log_path(manifest))
    }

    /// Fail unless running with root privileges.
    pub fn require_root(&self) -> Result<()> {
        if is_elevated() {
            Ok(())
        } else {
            Err(BaselineError::Privilege {
                message: "this command must run as root (try sudo)".to_string(),
            })
        }
    }

    /// The resolved target user; required.
    pub fn target_user(&self) -> Result<TargetUser> {
        resolve_target_user(self.user.as_deref())
    }

    /// The resolved target user, if one can be found.
    pub fn try_target_user(&self) -> Option<TargetUser> {
        self.target_user().ok()
    }
}
