//! Run-level behavior of the orchestrator against scripted commands.

use baseline::logging::RunLog;
use baseline::runner::{
    ExecutionPlanner, Flow, Orchestrator, RunOptions, RunReport, RunRequest, RunSettings,
    StepStatus,
};
use baseline::shell::{Identity, ScriptedExecutor, TargetUser};
use baseline::steps::{Principal, Step, StepId, StepRegistry, Unit};
use baseline::ui::MockUI;

fn alice() -> TargetUser {
    TargetUser::new("alice", "/home/alice")
}

fn root_step(id: &str, feature: &str) -> Step {
    Step::new(
        id,
        &format!("{}-{}", id, feature),
        Principal::Root,
        Unit::root(format!("install-{}", feature)),
    )
    .with_remove(Unit::root(format!("remove-{}", feature)))
}

fn run(
    registry: &StepRegistry,
    flow: Flow,
    options: &RunOptions,
    exec: &mut ScriptedExecutor,
    ui: &mut MockUI,
) -> RunReport {
    let settings = RunSettings::default();
    let target = alice();
    Orchestrator::new(registry, &settings, Some(&target))
        .run(flow, options, exec, ui, &mut RunLog::disabled())
        .unwrap()
}

fn auto(request: RunRequest) -> RunOptions {
    RunOptions {
        request,
        auto: true,
        dry_run: false,
    }
}

#[test]
fn skip_all_at_first_prompt_runs_nothing() {
    let registry = StepRegistry::new(vec![
        root_step("01", "headers"),
        root_step("02", "drivers"),
        root_step("03", "input"),
    ])
    .unwrap();
    let mut exec = ScriptedExecutor::new();
    let mut ui = MockUI::new();
    ui.set_prompt_response("step.01", "s");

    let report = run(&registry, Flow::Install, &RunOptions::default(), &mut exec, &mut ui);

    assert!(exec.invocations().is_empty());
    assert_eq!(report.ledger.len(), 3);
    assert_eq!(report.ledger.count(StepStatus::Skipped), 3);
    assert_eq!(ui.prompts_shown(), ["step.01"]);
}

#[test]
fn failed_user_phase_keeps_root_phase_from_running() {
    let registry = StepRegistry::new(vec![Step::new(
        "03",
        "03-korean-input",
        Principal::Dual,
        Unit::dual("ibus-setup --user", "modprobe uinput"),
    )])
    .unwrap();
    let mut exec = ScriptedExecutor::new();
    exec.fail("ibus-setup --user", 2);
    let mut ui = MockUI::new();

    let report = run(&registry, Flow::Install, &auto(RunRequest::All), &mut exec, &mut ui);

    assert_eq!(exec.commands(), vec!["ibus-setup --user"]);
    assert!(matches!(exec.invocations()[0].identity, Identity::User(ref u) if u.name == "alice"));
    assert_eq!(
        report.ledger.get(&StepId::new("03")).map(|r| r.status),
        Some(StepStatus::Failed)
    );
}

#[test]
fn from_request_with_failing_root_phase() {
    let registry = StepRegistry::new(vec![
        Step::new("01", "01-a", Principal::Root, Unit::root("a-root")),
        Step::new("02", "02-b", Principal::Dual, Unit::dual("b-user", "b-root")),
        Step::new("03", "03-c", Principal::Root, Unit::root("c-root")),
    ])
    .unwrap();
    let mut exec = ScriptedExecutor::new();
    exec.fail("b-root", 1);
    let mut ui = MockUI::new();

    let report = run(
        &registry,
        Flow::Install,
        &auto(RunRequest::From("02".to_string())),
        &mut exec,
        &mut ui,
    );

    assert_eq!(exec.commands(), vec!["b-user", "b-root", "c-root"]);
    assert_eq!(
        report.ledger.statuses(),
        vec![
            (StepId::new("02"), StepStatus::Failed),
            (StepId::new("03"), StepStatus::Ok),
        ]
    );
    assert!(report.ledger.get(&StepId::new("01")).is_none());
}

#[test]
fn repeated_runs_produce_the_same_statuses() {
    let registry = StepRegistry::new(vec![
        root_step("01", "headers"),
        root_step("02", "drivers"),
        root_step("03", "input"),
    ])
    .unwrap();

    let statuses = || {
        let mut exec = ScriptedExecutor::new();
        exec.fail("install-drivers", 1);
        let mut ui = MockUI::new();
        ui.set_prompt_response("step.03", "n");
        run(&registry, Flow::Install, &RunOptions::default(), &mut exec, &mut ui)
            .ledger
            .statuses()
    };

    let first = statuses();
    assert_eq!(first, statuses());
    assert_eq!(
        first.iter().map(|(_, s)| *s).collect::<Vec<_>>(),
        vec![StepStatus::Ok, StepStatus::Failed, StepStatus::Skipped]
    );
}

#[test]
fn summary_counts_and_reboot_recommendation() {
    let features = [
        "headers", "drivers", "input", "firewall", "fonts", "audio", "power", "theme",
    ];
    let steps: Vec<Step> = features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let step = root_step(&format!("{:02}", i + 1), f);
            if *f == "drivers" {
                step.with_reboot()
            } else {
                step
            }
        })
        .collect();
    let registry = StepRegistry::new(steps).unwrap();

    let mut exec = ScriptedExecutor::new();
    exec.fail("install-firewall", 1);
    let mut ui = MockUI::new();
    for id in ["03", "05", "06", "08"] {
        ui.set_prompt_response(&format!("step.{}", id), "n");
    }
    ui.set_prompt_response("reboot", "n");

    let report = run(&registry, Flow::Install, &RunOptions::default(), &mut exec, &mut ui);

    assert_eq!(report.summary.totals_line(), "Ok=3, Failed=1, Skipped=4");
    assert!(report.summary.reboot_recommended);
    assert!(!report.rebooted);
    assert_eq!(ui.summaries().len(), 1);
    assert!(ui.has_warning("Reboot postponed"));
}

#[test]
fn accepted_reboot_stops_the_run_and_reboots() {
    let registry = StepRegistry::new(vec![
        root_step("01", "headers"),
        root_step("02", "drivers").with_reboot(),
        root_step("03", "input"),
    ])
    .unwrap();
    let mut exec = ScriptedExecutor::new();
    let mut ui = MockUI::new();
    ui.set_default_prompt_response("y");

    let report = run(&registry, Flow::Install, &RunOptions::default(), &mut exec, &mut ui);

    assert!(report.rebooted);
    assert_eq!(report.ledger.len(), 2);
    assert!(!exec.ran("install-input"));
    assert!(exec.ran(baseline::runner::DEFAULT_REBOOT_COMMAND));
    assert!(ui.has_message("baseline install --from 03"));
}

#[test]
fn uninstall_runs_in_reverse() {
    let registry = StepRegistry::new(vec![
        root_step("01", "headers"),
        Step::new("02", "02-drivers", Principal::Root, Unit::root("install-drivers")),
        root_step("03", "input"),
    ])
    .unwrap();
    let mut exec = ScriptedExecutor::new();
    let mut ui = MockUI::new();

    let report = run(&registry, Flow::Uninstall, &auto(RunRequest::All), &mut exec, &mut ui);

    assert_eq!(exec.commands(), vec!["remove-input", "remove-headers"]);
    assert_eq!(report.summary.ok, 2);
}

#[test]
fn only_and_from_select_from_the_planned_view() {
    let registry = StepRegistry::new(vec![
        root_step("01", "headers"),
        root_step("02", "drivers"),
        root_step("03", "input"),
    ])
    .unwrap();

    let forward = ExecutionPlanner::forward(&registry);
    let ids = |steps: Vec<&Step>| steps.iter().map(|s| s.id.to_string()).collect::<Vec<_>>();

    assert_eq!(ids(forward.plan(&RunRequest::All).unwrap()), ["01", "02", "03"]);
    assert_eq!(
        ids(forward.plan(&RunRequest::Only("drivers".into())).unwrap()),
        ["02"]
    );
    assert_eq!(
        ids(forward.plan(&RunRequest::From("02".into())).unwrap()),
        ["02", "03"]
    );
    assert!(forward.plan(&RunRequest::Only("bluetooth".into())).is_err());

    let reverse = ExecutionPlanner::reverse(&registry);
    assert_eq!(ids(reverse.plan(&RunRequest::All).unwrap()), ["03", "02", "01"]);
    assert!(reverse.plan(&RunRequest::From("02".into())).is_err());
}

#[test]
fn missing_target_user_fails_before_any_step() {
    let registry = StepRegistry::new(vec![
        root_step("01", "headers"),
        Step::new("02", "02-input", Principal::User, Unit::user("ibus-setup")),
    ])
    .unwrap();
    let settings = RunSettings::default();
    let mut exec = ScriptedExecutor::new();

    let result = Orchestrator::new(&registry, &settings, None).run(
        Flow::Install,
        &auto(RunRequest::All),
        &mut exec,
        &mut MockUI::new(),
        &mut RunLog::disabled(),
    );

    assert!(result.is_err());
    assert!(exec.invocations().is_empty());
}

#[test]
fn unit_output_is_copied_to_the_run_log() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("baseline.log");
    let registry = StepRegistry::new(vec![Step::new(
        "05",
        "05-macbook-drivers",
        Principal::Root,
        Unit::root("make"),
    )])
    .unwrap();
    let mut exec = ScriptedExecutor::new();
    exec.set_output("make", &["CC hid-apple.o"]);
    let settings = RunSettings::default();

    {
        let mut log = RunLog::open(&path).unwrap();
        Orchestrator::new(&registry, &settings, None)
            .run(
                Flow::Install,
                &auto(RunRequest::All),
                &mut exec,
                &mut MockUI::new(),
                &mut log,
            )
            .unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    // "[2026-01-02 03:04:05] [05] CC hid-apple.o"
    let stamped = |l: &&str| l.len() > 22 && l.starts_with('[') && l.as_bytes()[20] == b']';
    assert!(lines.iter().all(stamped));

    let position = |needle: &str| {
        lines
            .iter()
            .position(|l| l.ends_with(needle) || l.contains(&format!("] {}", needle)))
            .unwrap_or_else(|| panic!("no log line for {:?}", needle))
    };
    let started = position("[05] Installing 05-macbook-drivers");
    let output = position("[05] CC hid-apple.o");
    let result = position("[05] Ok");
    assert!(started < output && output < result);
    assert!(content.contains("install finished: Ok=1, Failed=0, Skipped=0"));
}
