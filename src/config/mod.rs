//! Step manifest loading and parsing.
//!
//! # Manifest Format
//!
//! ```yaml
//! settings:
//!   log_file: /var/log/baseline.log
//! steps:
//!   - id: "01"
//!     name: 01-kernel-headers
//!     description: Install kernel headers
//!     principal: root
//!     install: apt-get install -y linux-headers-$(uname -r)
//! ```

pub mod loader;
pub mod schema;

pub use loader::{
    load_manifest, load_manifest_file, parse_manifest, ManifestPaths, LOCAL_MANIFEST,
    SYSTEM_MANIFEST,
};
pub use schema::{Manifest, PhasesConfig, PrincipalConfig, Settings, StepConfig, UnitConfig};
