//! The static, ordered catalog of steps.
//!
//! A [`StepRegistry`] is built once from a [`Manifest`] and is read-only
//! afterwards. Registry order is execution order: step N may assume the
//! effects of every step before it.

use std::fmt;

use serde::Serialize;

use crate::config::{Manifest, PhasesConfig, PrincipalConfig, StepConfig, UnitConfig};
use crate::error::{BaselineError, Result};

/// Ordinal key of a step ("01", "02", ...).
///
/// Ordering is plain string ordering, so ids must be zero-padded to a
/// common width for the registry order to match numeric order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity under which a step's units are invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Principal {
    /// The current, already privileged identity.
    Root,
    /// The unprivileged target user.
    User,
    /// Target user first, then root; root never runs after a failed user phase.
    Dual,
}

impl Principal {
    /// Whether invoking this principal needs a resolved target user.
    pub fn needs_target_user(self) -> bool {
        !matches!(self, Principal::Root)
    }
}

impl From<PrincipalConfig> for Principal {
    fn from(config: PrincipalConfig) -> Self {
        match config {
            PrincipalConfig::Root => Principal::Root,
            PrincipalConfig::User => Principal::User,
            PrincipalConfig::Dual => Principal::Dual,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Principal::Root => "root",
            Principal::User => "user",
            Principal::Dual => "user+root",
        };
        f.write_str(s)
    }
}

/// Opaque unit of work: the commands to run per identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

impl Unit {
    /// A unit that runs a single command as root.
    pub fn root(command: impl Into<String>) -> Self {
        Self {
            user: None,
            root: Some(command.into()),
            effect: None,
        }
    }

    /// A unit that runs a single command as the target user.
    pub fn user(command: impl Into<String>) -> Self {
        Self {
            user: Some(command.into()),
            root: None,
            effect: None,
        }
    }

    /// A two-phase unit: user command, then root command.
    pub fn dual(user: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            root: Some(root.into()),
            effect: None,
        }
    }

    /// Attach a human description of the effect.
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }

    fn from_config(config: &UnitConfig, principal: Principal) -> Self {
        match config {
            UnitConfig::Command(cmd) => match principal {
                Principal::User => Unit::user(cmd.clone()),
                // Dual with a bare string is rejected by `check_phases`.
                Principal::Root | Principal::Dual => Unit::root(cmd.clone()),
            },
            UnitConfig::Phases(PhasesConfig { user, root, effect }) => Unit {
                user: user.clone(),
                root: root.clone(),
                effect: effect.clone(),
            },
        }
    }

    fn check_phases(&self, principal: Principal) -> std::result::Result<(), &'static str> {
        match (principal, self.user.is_some(), self.root.is_some()) {
            (Principal::Root, false, true) => Ok(()),
            (Principal::User, true, false) => Ok(()),
            (Principal::Dual, true, true) => Ok(()),
            (Principal::Root, ..) => Err("a root step needs exactly a `root` command"),
            (Principal::User, ..) => Err("a user step needs exactly a `user` command"),
            (Principal::Dual, ..) => Err("a dual step needs both `user` and `root` commands"),
        }
    }
}

/// A single step descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub id: StepId,
    pub name: String,
    pub description: String,
    pub principal: Principal,
    /// Offer a reboot after this step completes successfully.
    pub reboot: bool,
    pub install: Unit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<Unit>,
}

impl Step {
    /// Create a step with only an install unit.
    pub fn new(id: &str, name: &str, principal: Principal, install: Unit) -> Self {
        Self {
            id: StepId::new(id),
            name: name.to_string(),
            description: String::new(),
            principal,
            reboot: false,
            install,
            remove: None,
            check: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_reboot(mut self) -> Self {
        self.reboot = true;
        self
    }

    pub fn with_remove(mut self, remove: Unit) -> Self {
        self.remove = Some(remove);
        self
    }

    pub fn with_check(mut self, check: Unit) -> Self {
        self.check = Some(check);
        self
    }

    /// The step name with a leading ordinal prefix (`03-`, `03_`) removed.
    pub fn feature_name(&self) -> &str {
        strip_ordinal_prefix(&self.name)
    }

    fn from_config(config: &StepConfig) -> Result<Self> {
        let principal = Principal::from(config.principal);
        let invalid = |what: &str, why: &str| BaselineError::ManifestInvalid {
            message: format!("step '{}' {}: {}", config.name, what, why),
        };

        if matches!(config.principal, PrincipalConfig::Dual) {
            for (what, unit) in [
                ("install", Some(&config.install)),
                ("remove", config.remove.as_ref()),
                ("check", config.check.as_ref()),
            ] {
                if let Some(UnitConfig::Command(_)) = unit {
                    return Err(invalid(what, "a dual step needs the `user`/`root` form"));
                }
            }
        }

        let install = Unit::from_config(&config.install, principal);
        install
            .check_phases(principal)
            .map_err(|why| invalid("install", why))?;

        let remove = config
            .remove
            .as_ref()
            .map(|u| Unit::from_config(u, principal));
        if let Some(unit) = &remove {
            unit.check_phases(principal)
                .map_err(|why| invalid("remove", why))?;
        }

        let check = config
            .check
            .as_ref()
            .map(|u| Unit::from_config(u, principal));
        if let Some(unit) = &check {
            unit.check_phases(principal)
                .map_err(|why| invalid("check", why))?;
        }

        Ok(Self {
            id: StepId::new(config.id.trim()),
            name: config.name.trim().to_string(),
            description: config.description.clone(),
            principal,
            reboot: config.reboot,
            install,
            remove,
            check,
        })
    }
}

fn strip_ordinal_prefix(name: &str) -> &str {
    let digits = name.len() - name.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return name;
    }
    match name[digits..].strip_prefix(['-', '_']) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

/// Ordered, immutable catalog of steps.
#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    steps: Vec<Step>,
}

impl StepRegistry {
    /// Build a registry, enforcing unique, strictly increasing ids and
    /// unique, non-empty names.
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        for (i, step) in steps.iter().enumerate() {
            if step.id.as_str().is_empty() {
                return Err(BaselineError::ManifestInvalid {
                    message: format!("step #{} has an empty id", i + 1),
                });
            }
            if step.name.is_empty() {
                return Err(BaselineError::ManifestInvalid {
                    message: format!("step '{}' has an empty name", step.id),
                });
            }
            if let Some(prev) = i.checked_sub(1).map(|p| &steps[p]) {
                if step.id <= prev.id {
                    return Err(BaselineError::ManifestInvalid {
                        message: format!(
                            "step ids must be unique and increasing: '{}' follows '{}'",
                            step.id, prev.id
                        ),
                    });
                }
            }
            if steps[..i].iter().any(|s| s.name == step.name) {
                return Err(BaselineError::ManifestInvalid {
                    message: format!("duplicate step name '{}'", step.name),
                });
            }
        }
        Ok(Self { steps })
    }

    /// Build a registry from a parsed manifest.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let steps = manifest
            .steps
            .iter()
            .map(Step::from_config)
            .collect::<Result<Vec<_>>>()?;
        Self::new(steps)
    }

    /// All steps in registry order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Look up a step by id.
    pub fn get(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    /// The step following `id` in registry order.
    pub fn next_after(&self, id: &StepId) -> Option<&Step> {
        let pos = self.steps.iter().position(|s| &s.id == id)?;
        self.steps.get(pos + 1)
    }

    /// Resolve a user-typed reference over the whole registry.
    pub fn resolve(&self, reference: &str) -> Result<&Step> {
        resolve_in(self.steps.iter(), reference)
    }
}

/// Resolve a step reference against `candidates`, scanned in the given order.
///
/// Precedence, first match wins within each tier:
/// 1. exact id or name
/// 2. name with its ordinal prefix stripped (the bare feature name)
/// 3. first name containing `reference` as a substring
pub fn resolve_in<'a, I>(candidates: I, reference: &str) -> Result<&'a Step>
where
    I: Iterator<Item = &'a Step> + Clone,
{
    let reference = reference.trim();
    let not_found = || BaselineError::NotFound {
        reference: reference.to_string(),
    };
    if reference.is_empty() {
        return Err(not_found());
    }

    candidates
        .clone()
        .find(|s| s.id.as_str() == reference || s.name == reference)
        .or_else(|| candidates.clone().find(|s| s.feature_name() == reference))
        .or_else(|| candidates.clone().find(|s| s.name.contains(reference)))
        .ok_or_else(not_found)
}
