//! Host identity queries: privilege and the unprivileged target user.

use std::path::PathBuf;

use crate::error::{BaselineError, Result};

/// The unprivileged account that `user` and `dual` steps run as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUser {
    /// Login name.
    pub name: String,
    /// Home directory from the passwd database.
    pub home: PathBuf,
}

impl TargetUser {
    pub fn new(name: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            home: home.into(),
        }
    }
}

/// Check if running in a CI environment.
///
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Pick the target user name: an explicit `--user` wins, then `SUDO_USER`.
///
/// `SUDO_USER=root` (root running `sudo` on itself) does not name an
/// unprivileged account and is ignored.
pub fn target_user_name(explicit: Option<&str>, sudo_user: Option<&str>) -> Option<String> {
    explicit
        .or(sudo_user.filter(|u| *u != "root"))
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
}

/// Resolve the target user from `--user` / `SUDO_USER` and the passwd database.
pub fn resolve_target_user(explicit: Option<&str>) -> Result<TargetUser> {
    let sudo_user = std::env::var("SUDO_USER").ok();
    let name = target_user_name(explicit, sudo_user.as_deref()).ok_or_else(|| {
        BaselineError::Privilege {
            message: "no target user: run through sudo or pass --user <name>".to_string(),
        }
    })?;

    let home = lookup_home(&name).ok_or_else(|| BaselineError::Privilege {
        message: format!("target user '{}' does not exist", name),
    })?;

    Ok(TargetUser { name, home })
}

/// Look up a user's home directory in the passwd database.
#[cfg(unix)]
pub fn lookup_home(name: &str) -> Option<PathBuf> {
    use std::ffi::{CStr, CString};

    let c_name = CString::new(name).ok()?;
    // SAFETY: c_name is a valid NUL-terminated string. getpwnam returns either
    // NULL or a pointer to static storage that stays valid until the next
    // getpw* call; the directory is copied out before returning.
    unsafe {
        let entry = libc::getpwnam(c_name.as_ptr());
        if entry.is_null() || (*entry).pw_dir.is_null() {
            return None;
        }
        let dir = CStr::from_ptr((*entry).pw_dir);
        Some(PathBuf::from(dir.to_string_lossy().into_owned()))
    }
}

#[cfg(not(unix))]
pub fn lookup_home(_name: &str) -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_user_wins_over_sudo_user() {
        assert_eq!(
            target_user_name(Some("alice"), Some("bob")),
            Some("alice".to_string())
        );
    }

    #[test]
    fn sudo_user_used_when_no_explicit_user() {
        assert_eq!(target_user_name(None, Some("bob")), Some("bob".to_string()));
    }

    #[test]
    fn sudo_user_root_is_ignored() {
        assert_eq!(target_user_name(None, Some("root")), None);
        assert_eq!(target_user_name(None, None), None);
        assert_eq!(target_user_name(Some("  "), None), None);
    }

    #[cfg(unix)]
    #[test]
    fn lookup_home_finds_root() {
        assert!(lookup_home("root").is_some());
    }

    #[test]
    fn lookup_home_unknown_user() {
        assert!(lookup_home("no-such-user-baseline-test").is_none());
        assert!(lookup_home("bad\0name").is_none());
    }

    #[test]
    fn resolve_unknown_explicit_user_is_privilege_error() {
        let err = resolve_target_user(Some("no-such-user-baseline-test")).unwrap_err();
        assert!(matches!(err, BaselineError::Privilege { .. }));
    }

    #[test]
    fn is_ci_detects_environment() {
        // Just ensure function doesn't panic
        let _ = is_ci();
    }
}
