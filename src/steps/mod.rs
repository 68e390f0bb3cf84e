//! Step descriptors and the registry that orders them.
//!
//! - [`Step`] - One named, idempotent provisioning action
//! - [`Principal`] - Identity the step's units run under
//! - [`Unit`] - The opaque per-identity commands of a step
//! - [`StepRegistry`] - Ordered, validated catalog built from the manifest
//!
//! # Example
//!
//! ```
//! use baseline::steps::{Principal, Step, StepRegistry, Unit};
//!
//! let registry = StepRegistry::new(vec![
//!     Step::new("01", "01-kernel-headers", Principal::Root, Unit::root("true")),
//!     Step::new("02", "02-macbook-drivers", Principal::Root, Unit::root("true")),
//! ])
//! .unwrap();
//!
//! assert_eq!(registry.resolve("drivers").unwrap().id.as_str(), "02");
//! ```

pub mod registry;

pub use registry::{resolve_in, Principal, Step, StepId, StepRegistry, Unit};
