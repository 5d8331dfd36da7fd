//! End-to-end tests for the dotstep binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CONFIG: &str = r#"
categories:
  - name: Core
    steps:
      - name: first
        description: Say hi
        command: echo first
      - name: second
        command: exit 3
        depends_on: [first]
"#;

const FIXED_CONFIG: &str = r#"
categories:
  - name: Core
    steps:
      - name: first
        description: Say hi
        command: echo first
      - name: second
        command: "true"
        depends_on: [first]
"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dotstep.yml"), config).unwrap();
        Self { dir }
    }

    fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn session_file(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    fn write_config(&self, config: &str) {
        fs::write(self.dir.path().join("dotstep.yml"), config).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("dotstep"));
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env_remove("DOTSTEP_CONFIG")
            .env_remove("DOTSTEP_DRY_RUN")
            .env_remove("DOTSTEP_CONFIRM")
            .arg("--non-interactive")
            .arg("--no-color")
            .arg("--session-file")
            .arg(self.session_file());
        cmd
    }
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("dotstep"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dependency-ordered"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("dotstep"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn no_subcommand_lists_steps() {
    let project = Project::new(CONFIG);
    project
        .cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Core"))
        .stdout(predicate::str::contains("first"))
        .stdout(predicate::str::contains("depends on: first"))
        .stdout(predicate::str::contains("2 steps in 1 categories"));
}

#[test]
fn all_runs_steps_in_order_and_clears_session() {
    let project = Project::new(FIXED_CONFIG);
    project
        .cmd()
        .arg("all")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/2] Executing: first"))
        .stdout(predicate::str::contains("[2/2] Executing: second"));
    assert!(!project.session_file().exists());
}

#[test]
fn failed_run_keeps_session_and_resume_finishes_it() {
    let project = Project::new(CONFIG);
    project
        .cmd()
        .arg("all")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Critical step failed: second"));

    let saved = fs::read_to_string(project.session_file()).unwrap();
    assert!(saved.contains("\"pending_steps\""));
    assert!(saved.contains("second"));

    project
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: second"));

    project.write_config(FIXED_CONFIG);
    project
        .cmd()
        .arg("resume")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resuming session"));
    assert!(!project.session_file().exists());
}

#[test]
fn dry_run_prints_plan_without_session() {
    let project = Project::new(CONFIG);
    project
        .cmd()
        .args(["all", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] Would execute: Say hi"));
    assert!(!project.session_file().exists());
}

#[test]
fn steps_with_only_unknown_names_fails() {
    let project = Project::new(CONFIG);
    project
        .cmd()
        .args(["steps", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown step: nope"))
        .stderr(predicate::str::contains("No valid steps selected"));
}

#[test]
fn steps_runs_named_step_after_dependency() {
    let project = Project::new(FIXED_CONFIG);
    project
        .cmd()
        .args(["steps", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Executing dependency: first"));
}

#[test]
fn status_and_abandon_without_session() {
    let project = Project::new(CONFIG);
    project
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved session"));
    project
        .cmd()
        .arg("abandon")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved session"));
}

#[test]
fn abandon_deletes_saved_session() {
    let project = Project::new(CONFIG);
    project.cmd().arg("all").assert().code(1);
    assert!(project.session_file().exists());

    project.cmd().arg("abandon").assert().success();
    assert!(!project.session_file().exists());
}

#[test]
fn corrupt_session_resumes_nothing() {
    let project = Project::new(CONFIG);
    fs::write(project.session_file(), "{ not json").unwrap();

    project
        .cmd()
        .arg("resume")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Nothing to resume"));
}

#[test]
fn missing_config_exits_with_2() {
    let project = Project::empty();
    project
        .cmd()
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No configuration found"));
}

#[test]
fn dependency_cycle_is_an_error() {
    let project = Project::new(
        r#"
categories:
  - name: Loop
    steps:
      - { name: a, command: "true", depends_on: [b] }
      - { name: b, command: "true", depends_on: [a] }
"#,
    );
    project
        .cmd()
        .arg("all")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Circular dependency"));
    assert!(!project.session_file().exists());
}

#[test]
fn completions_mention_binary() {
    let mut cmd = Command::new(cargo_bin("dotstep"));
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dotstep"));
}
