//! Manifest discovery and loading.
//!
//! The manifest is searched for in this order, first hit wins:
//! 1. Explicit path (`--manifest` / `BASELINE_MANIFEST`)
//! 2. `./baseline.yml`
//! 3. `/etc/baseline/steps.yml`

use crate::config::schema::Manifest;
use crate::error::{BaselineError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// System-wide manifest location.
pub const SYSTEM_MANIFEST: &str = "/etc/baseline/steps.yml";

/// Manifest file name looked up in the working directory.
pub const LOCAL_MANIFEST: &str = "baseline.yml";

/// Candidate manifest locations in priority order.
#[derive(Debug, Clone)]
pub struct ManifestPaths {
    candidates: Vec<PathBuf>,
}

impl ManifestPaths {
    /// Build the search list for the given working directory.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Self {
        let candidates = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => vec![cwd.join(LOCAL_MANIFEST), PathBuf::from(SYSTEM_MANIFEST)],
        };
        Self { candidates }
    }

    /// The first candidate that exists on disk.
    pub fn resolve(&self) -> Option<&Path> {
        self.candidates
            .iter()
            .find(|p| p.is_file())
            .map(PathBuf::as_path)
    }

    /// All candidates, for error reporting.
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

/// Locate and load the manifest.
///
/// # Errors
///
/// Returns `ManifestNotFound` if no candidate exists.
/// Returns `ManifestParse` if the YAML is invalid.
pub fn load_manifest(paths: &ManifestPaths) -> Result<(PathBuf, Manifest)> {
    let path = paths
        .resolve()
        .ok_or_else(|| BaselineError::ManifestNotFound {
            searched: paths
                .candidates()
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })?
        .to_path_buf();

    let manifest = load_manifest_file(&path)?;
    Ok((path, manifest))
}

/// Load a single manifest file.
pub fn load_manifest_file(path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(path)?;
    parse_manifest(&content, path)
}

/// Parse YAML content into a [`Manifest`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<Manifest> {
    serde_yaml::from_str(content).map_err(|e| BaselineError::ManifestParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
