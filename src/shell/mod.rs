//! Process execution and host identity.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{
    execute_streaming, CommandExecutor, CommandResult, Identity, Invocation, OutputLine,
    SystemExecutor, DEFAULT_SHELL,
};
pub use mock::ScriptedExecutor;
pub use platform::{is_ci, is_elevated, lookup_home, resolve_target_user, TargetUser};
