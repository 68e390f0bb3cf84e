//! Step execution orchestration.
//!
//! ```
//! use baseline::logging::RunLog;
//! use baseline::runner::{Flow, Orchestrator, RunOptions, RunSettings, StepStatus};
//! use baseline::shell::ScriptedExecutor;
//! use baseline::steps::{Principal, Step, StepRegistry, Unit};
//! use baseline::ui::MockUI;
//!
//! let registry = StepRegistry::new(vec![
//!     Step::new("01", "01-headers", Principal::Root, Unit::root("apt-get install -y headers")),
//! ])
//! .unwrap();
//! let settings = RunSettings::default();
//! let options = RunOptions { auto: true, ..Default::default() };
//!
//! let report = Orchestrator::new(&registry, &settings, None)
//!     .run(
//!         Flow::Install,
//!         &options,
//!         &mut ScriptedExecutor::new(),
//!         &mut MockUI::new(),
//!         &mut RunLog::disabled(),
//!     )
//!     .unwrap();
//! assert_eq!(report.ledger.count(StepStatus::Ok), 1);
//! ```

pub mod ledger;
pub mod orchestrator;
pub mod plan;
pub mod principal;
pub mod prompt;
pub mod report;

pub use ledger::{Ledger, StepResult, StepStatus};
pub use orchestrator::{
    Flow, Orchestrator, RunOptions, RunReport, RunSettings, DEFAULT_REBOOT_COMMAND,
};
pub use plan::{Direction, ExecutionPlanner, RunRequest};
pub use principal::{Action, PrincipalRunner, UnitOutcome, UNRESOLVED_USER};
pub use prompt::{parse_choice, step_prompt_key, Choice, Decision, PromptController, PromptState};
pub use report::{reboot_gate, resume_hint, GateOutcome, RunSummary, REBOOT_PROMPT_KEY};
