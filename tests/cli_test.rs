//! Integration tests for the `baseline` binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn manifest(marker: &Path) -> String {
    format!(
        r#"
settings:
  shell: /bin/sh
steps:
  - id: "01"
    name: 01-kernel-headers
    description: Install kernel headers
    principal: root
    install: touch {marker}
    remove:
      root: rm -f /usr/src/linux-headers
      effect: remove the kernel headers
  - id: "02"
    name: 02-macbook-drivers
    description: Build the keyboard driver
    principal: root
    reboot: true
    install: touch {marker}
  - id: "03"
    name: 03-korean-input
    description: Configure the input method
    principal: dual
    install:
      user: touch {marker}
      root: touch {marker}
    remove:
      user: touch {marker}
      root: touch {marker}
"#,
        marker = marker.display()
    )
}

fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    let marker = temp.path().join("ran");
    fs::write(temp.path().join("baseline.yml"), manifest(&marker)).unwrap();
    temp
}

fn baseline(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("baseline"));
    cmd.current_dir(dir)
        .env_remove("BASELINE_MANIFEST")
        .env_remove("BASELINE_LOG_FILE")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    baseline(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("uninstall"))
        .stdout(predicate::str::contains("verify"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    baseline(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_install_help_lists_flags() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    baseline(temp.path())
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--auto"))
        .stdout(predicate::str::contains("--only"))
        .stdout(predicate::str::contains("--from"));
    Ok(())
}

#[test]
fn cli_missing_subcommand_is_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    baseline(temp.path()).assert().code(1);
    Ok(())
}

#[test]
fn cli_only_and_from_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["install", "--only", "01", "--from", "02"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used with"));
    Ok(())
}

#[test]
fn cli_unknown_flag_is_usage_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["uninstall", "--from", "02"])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn cli_list_prints_registry() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("01-kernel-headers"))
        .stdout(predicate::str::contains("Build the keyboard driver"))
        .stdout(predicate::str::contains("user+root"));
    assert!(!temp.path().join("ran").exists());
    Ok(())
}

#[test]
fn cli_install_list_flag_has_no_side_effects() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["install", "-l"])
        .assert()
        .success()
        .stdout(predicate::str::contains("03-korean-input"));
    assert!(!temp.path().join("ran").exists());
    Ok(())
}

#[test]
fn cli_list_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    let output = baseline(temp.path()).args(["list", "--json"]).output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let steps = value.as_array().unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[2]["principal"], "dual");
    Ok(())
}

#[test]
fn cli_explicit_manifest_flag() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    let elsewhere = TempDir::new()?;
    baseline(elsewhere.path())
        .args(["list", "--manifest"])
        .arg(temp.path().join("baseline.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("02-macbook-drivers"));
    Ok(())
}

#[test]
fn cli_missing_manifest_exits_1() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    baseline(temp.path())
        .args(["list", "--manifest", "nope.yml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Step manifest not found"));
    Ok(())
}

#[test]
fn cli_invalid_manifest_exits_1() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(
        temp.path().join("baseline.yml"),
        "steps:\n  - id: \"01\"\n    name: 01-input\n    principal: dual\n    install: ibus-setup\n",
    )?;
    baseline(temp.path())
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid manifest"));
    Ok(())
}

#[test]
fn cli_bad_headless_answer_still_prints_summary() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["uninstall", "--dry-run"])
        .env("BASELINE_PROMPT_STEP_01", "maybe")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Ok=1, Failed=0, Skipped=0"))
        .stderr(predicate::str::contains("invalid answer 'maybe'"));
    Ok(())
}

#[test]
fn cli_uninstall_dry_run_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["uninstall", "--dry-run", "--auto"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "01-kernel-headers: would remove the kernel headers (as root)",
        ))
        .stdout(predicate::str::contains("03-korean-input: would run as"))
        .stdout(predicate::str::contains("Ok=2, Failed=0, Skipped=0"))
        .stdout(predicate::str::contains("02-macbook-drivers").not());
    assert!(!temp.path().join("ran").exists());
    Ok(())
}

#[test]
fn cli_uninstall_dry_run_answers_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["uninstall", "--dry-run"])
        .env("BASELINE_PROMPT_STEP_03", "n")
        .assert()
        .success()
        .stdout(predicate::str::contains("03-korean-input skipped"))
        .stdout(predicate::str::contains("Ok=1, Failed=0, Skipped=1"));
    Ok(())
}

#[test]
fn cli_uninstall_dry_run_skip_all() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["uninstall", "--dry-run"])
        .env("BASELINE_PROMPT_STEP_03", "s")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ok=0, Failed=0, Skipped=2"));
    Ok(())
}

#[test]
fn cli_uninstall_dry_run_unknown_only() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup();
    baseline(temp.path())
        .args(["uninstall", "--dry-run", "--only", "bluetooth"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No step matches 'bluetooth'"))
        .stdout(predicate::str::contains("would").not());
    assert!(!temp.path().join("ran").exists());
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    baseline(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("baseline"));
    Ok(())
}
