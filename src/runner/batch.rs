//! Session-aware batch runs.
//!
//! [`SessionRunner`] drives an [`Executor`] while keeping the on-disk
//! session in step with progress, so an interrupted run can be resumed.

use tracing::{debug, info};

use crate::error::Result;
use crate::session::SessionStore;
use crate::steps::StepResult;
use crate::ui::UserInterface;

use super::dependency::DependencyResolver;
use super::executor::{report_result, ExecutionSummary, Executor};
use super::interrupt::{InterruptFlag, INTERRUPTED_EXIT_CODE};

const CONTINUE_PROMPT: &str = "Continue with remaining steps?";

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step that ran succeeded.
    Success,
    /// At least one step failed.
    Failed,
    /// The user interrupted the run.
    Interrupted,
    /// There was nothing to run.
    NothingToRun,
}

impl RunOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failed | Self::NothingToRun => 1,
            Self::Interrupted => INTERRUPTED_EXIT_CODE,
        }
    }
}

/// Outcome plus the counts behind it.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub summary: ExecutionSummary,
}

impl RunReport {
    fn nothing_to_run() -> Self {
        Self {
            outcome: RunOutcome::NothingToRun,
            summary: ExecutionSummary::default(),
        }
    }

    fn from_summary(summary: ExecutionSummary) -> Self {
        let outcome = if summary.interrupted {
            RunOutcome::Interrupted
        } else if summary.failed > 0 {
            RunOutcome::Failed
        } else {
            RunOutcome::Success
        };
        Self { outcome, summary }
    }
}

/// Options for batch runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Keep going after a failure when no one can be asked.
    pub continue_on_error: bool,
    /// Answer yes to every continue prompt.
    pub assume_yes: bool,
}

/// Runs steps while checkpointing the session after each one.
///
/// Dry runs never touch the session on disk.
pub struct SessionRunner {
    executor: Executor,
    store: SessionStore,
    options: RunOptions,
    interrupt: InterruptFlag,
}

impl SessionRunner {
    pub fn new(executor: Executor, store: SessionStore, options: RunOptions) -> Self {
        Self::with_interrupt_flag(executor, store, options, InterruptFlag::process())
    }

    /// Create a runner that stops when `interrupt` is raised.
    pub fn with_interrupt_flag(
        mut executor: Executor,
        store: SessionStore,
        options: RunOptions,
        interrupt: InterruptFlag,
    ) -> Self {
        executor.set_interrupt_flag(interrupt.clone());
        Self {
            executor,
            store,
            options,
            interrupt,
        }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Run every registered step in dependency order.
    pub fn run_all(&mut self, ui: &mut dyn UserInterface) -> Result<RunReport> {
        let names: Vec<String> = self
            .executor
            .steps()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        if names.is_empty() {
            ui.warning("No steps are configured");
            return Ok(RunReport::nothing_to_run());
        }

        // A cycle must surface before a session is written for it.
        DependencyResolver::new(self.executor.steps()).resolve()?;

        let persist = !self.executor.is_dry_run();
        if persist {
            self.store.save(&names)?;
        }
        self.executor.clear_results();
        ui.show_header(&format!("Running all {} steps", names.len()));

        let store = &self.store;
        let mut checkpoint_error = None;
        let summary = self.executor.execute_all_with(ui, |name, result| {
            if persist && result.success && checkpoint_error.is_none() {
                if let Err(e) = store.update_progress(name) {
                    checkpoint_error = Some(e);
                }
            }
        })?;
        if let Some(e) = checkpoint_error {
            return Err(e.into());
        }

        self.finish(summary, persist, false, ui)
    }

    /// Run the named steps, each after its prerequisites.
    ///
    /// Unknown names are reported and dropped. A fresh session is saved for
    /// the remaining selection.
    pub fn run_steps<S: AsRef<str>>(
        &mut self,
        names: &[S],
        ui: &mut dyn UserInterface,
    ) -> Result<RunReport> {
        let mut selected: Vec<String> = Vec::new();
        for name in names.iter().map(AsRef::as_ref) {
            if self.executor.step(name).is_none() {
                ui.warning(&format!("Unknown step: {}", name));
            } else if !selected.iter().any(|s| s == name) {
                selected.push(name.to_string());
            }
        }

        if selected.is_empty() {
            ui.error("No valid steps selected");
            return Ok(RunReport::nothing_to_run());
        }

        if !self.executor.is_dry_run() {
            self.store.save(&selected)?;
        }
        ui.show_header(&format!("Running {} selected steps", selected.len()));
        self.run_named(&selected, ui)
    }

    /// Continue the saved session's pending steps.
    pub fn resume(&mut self, ui: &mut dyn UserInterface) -> Result<RunReport> {
        let Some(session) = self.store.load()? else {
            ui.warning("No saved session to resume");
            return Ok(RunReport::nothing_to_run());
        };

        if session.pending_steps.is_empty() {
            if !self.executor.is_dry_run() {
                self.store.cleanup()?;
            }
            ui.warning("Nothing to resume; the saved session has no pending steps");
            return Ok(RunReport::nothing_to_run());
        }

        let mut pending = Vec::with_capacity(session.pending_steps.len());
        for name in session.pending_steps {
            if self.executor.step(&name).is_some() {
                pending.push(name);
            } else {
                ui.warning(&format!(
                    "Step '{}' is no longer configured; dropping it from the session",
                    name
                ));
                if !self.executor.is_dry_run() {
                    self.store.update_progress(&name)?;
                }
            }
        }

        if pending.is_empty() {
            if !self.executor.is_dry_run() {
                self.store.cleanup()?;
            }
            return Ok(RunReport::nothing_to_run());
        }

        ui.show_header(&format!(
            "Resuming session from {} ({} of {} steps remaining)",
            session.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            pending.len(),
            session.selected_steps.len()
        ));
        self.run_named(&pending, ui)
    }

    fn run_named(&mut self, names: &[String], ui: &mut dyn UserInterface) -> Result<RunReport> {
        let persist = !self.executor.is_dry_run();
        let total = names.len();
        let mut interrupted = false;
        let mut declined = false;

        self.executor.clear_results();

        for (i, name) in names.iter().enumerate() {
            if self.interrupt.is_set() {
                info!("Run interrupted before step '{}'", name);
                interrupted = true;
                break;
            }

            ui.step_started(name, i + 1, total);

            if self
                .executor
                .step(name)
                .is_some_and(|s| s.is_completed())
            {
                ui.step_skipped(name, Some("already completed"));
                if persist {
                    self.store.update_progress(name)?;
                }
                continue;
            }

            let Some(result) = self.executor.execute_step(name, ui)? else {
                debug!("Step '{}' disappeared during run", name);
                continue;
            };

            if result.success {
                report_result(name, &result, ui);
                if persist {
                    self.store.update_progress(name)?;
                }
            } else {
                ui.step_failed(name, &failure_text(name, &result), result.duration);
            }

            if self.interrupt.is_set() {
                info!("Run interrupted during step '{}'", name);
                interrupted = true;
                break;
            }

            if !result.success && i + 1 < total && !self.should_continue(ui)? {
                declined = true;
                break;
            }
        }

        let mut summary = self.executor.summary();
        summary.interrupted = interrupted;
        self.finish(summary, persist, declined, ui)
    }

    fn should_continue(&self, ui: &mut dyn UserInterface) -> Result<bool> {
        if self.options.assume_yes {
            return Ok(true);
        }
        if ui.is_interactive() {
            return ui.confirm(CONTINUE_PROMPT, false);
        }
        Ok(self.options.continue_on_error)
    }

    fn finish(
        &mut self,
        summary: ExecutionSummary,
        persist: bool,
        declined: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<RunReport> {
        ui.show_summary(&summary);

        if persist && !summary.interrupted && !self.interrupt.is_set() {
            let finished = self
                .store
                .load()?
                .map_or(true, |session| session.is_finished());
            if finished || declined {
                self.store.cleanup()?;
            } else {
                ui.message("Run `dotstep resume` to retry the remaining steps.");
            }
        }

        Ok(RunReport::from_summary(summary))
    }
}

fn failure_text(name: &str, result: &StepResult) -> String {
    if result.step_name != name {
        format!(
            "dependency '{}' failed: {}",
            result.step_name,
            result.error_message()
        )
    } else {
        result.error_message().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::Step;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    type Log = Rc<RefCell<Vec<String>>>;

    fn step(name: &str, deps: &[&str], fail: bool, log: &Log) -> Step {
        let log = Rc::clone(log);
        Step::builder(name)
            .dependencies(deps.iter().copied())
            .action_fn(move |n| {
                log.borrow_mut().push(n.to_string());
                if fail {
                    Ok(StepResult::failure(n, "boom", "", Duration::ZERO))
                } else {
                    Ok(StepResult::success(n, "ok", Duration::ZERO))
                }
            })
            .build()
            .unwrap()
    }

    fn runner(temp: &TempDir, steps: Vec<Step>, options: RunOptions) -> SessionRunner {
        let executor = Executor::with_steps(false, steps).unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        SessionRunner::with_interrupt_flag(executor, store, options, InterruptFlag::detached())
    }

    #[test]
    fn run_all_success_removes_session() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![step("b", &["a"], false, &log), step("a", &[], false, &log)],
            RunOptions::default(),
        );
        let mut ui = MockUI::new();

        let report = runner.run_all(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert!(!runner.store().exists());
        assert_eq!(ui.summaries().len(), 1);
    }

    #[test]
    fn run_all_failure_keeps_pending_session() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![
                step("a", &[], false, &log),
                step("b", &[], true, &log),
                step("c", &[], false, &log),
            ],
            RunOptions::default(),
        );
        let mut ui = MockUI::new();

        let report = runner.run_all(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Failed);
        assert_eq!(report.outcome.exit_code(), 1);
        let session = runner.store().load().unwrap().unwrap();
        assert_eq!(session.completed_steps, vec!["a"]);
        assert_eq!(session.pending_steps, vec!["b", "c"]);
    }

    #[test]
    fn run_all_cycle_fails_before_saving() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![step("a", &["b"], false, &log), step("b", &["a"], false, &log)],
            RunOptions::default(),
        );
        let mut ui = MockUI::new();

        let err = runner.run_all(&mut ui).unwrap_err();

        assert!(err.to_string().contains("Circular dependency"));
        assert!(log.borrow().is_empty());
        assert!(!runner.store().exists());
    }

    #[test]
    fn run_steps_drops_unknown_names() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(&temp, vec![step("a", &[], false, &log)], RunOptions::default());
        let mut ui = MockUI::new();

        let report = runner.run_steps(&["ghost", "a"], &mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Success);
        assert!(ui.has_warning("Unknown step: ghost"));
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn run_steps_with_no_valid_names_fails() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(&temp, vec![step("a", &[], false, &log)], RunOptions::default());
        let mut ui = MockUI::new();

        let report = runner.run_steps(&["ghost"], &mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::NothingToRun);
        assert!(!runner.store().exists());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn run_steps_runs_dependency_once() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![step("a", &[], false, &log), step("b", &["a"], false, &log)],
            RunOptions::default(),
        );
        let mut ui = MockUI::new();

        runner.run_steps(&["b", "a"], &mut ui).unwrap();

        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(ui.skipped(), &["a".to_string()]);
    }

    #[test]
    fn declining_to_continue_stops_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![step("a", &[], true, &log), step("b", &[], false, &log)],
            RunOptions::default(),
        );
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.queue_confirm_responses(vec![false]);

        let report = runner.run_steps(&["a", "b"], &mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Failed);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(ui.confirms_shown(), &[CONTINUE_PROMPT.to_string()]);
        assert!(!runner.store().exists());
    }

    #[test]
    fn continuing_leaves_failed_step_pending() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![step("a", &[], true, &log), step("b", &[], false, &log)],
            RunOptions::default(),
        );
        let mut ui = MockUI::new();
        ui.set_interactive(true);
        ui.queue_confirm_responses(vec![true]);

        runner.run_steps(&["a", "b"], &mut ui).unwrap();

        assert_eq!(*log.borrow(), vec!["a", "b"]);
        let session = runner.store().load().unwrap().unwrap();
        assert_eq!(session.pending_steps, vec!["a"]);
        assert_eq!(session.completed_steps, vec!["b"]);
        assert!(ui.has_message("dotstep resume"));
    }

    #[test]
    fn non_interactive_uses_continue_on_error() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![step("a", &[], true, &log), step("b", &[], false, &log)],
            RunOptions {
                continue_on_error: true,
                assume_yes: false,
            },
        );
        let mut ui = MockUI::new();

        runner.run_steps(&["a", "b"], &mut ui).unwrap();

        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert!(ui.confirms_shown().is_empty());
    }

    #[test]
    fn dependency_failure_is_reported_for_requested_step() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![step("a", &[], true, &log), step("b", &["a"], false, &log)],
            RunOptions::default(),
        );
        let mut ui = MockUI::new();

        runner.run_steps(&["b"], &mut ui).unwrap();

        assert_eq!(ui.failed()[0].0, "b");
        assert!(ui.failed()[0].1.contains("dependency 'a' failed"));
    }

    #[test]
    fn resume_without_session_fails() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(&temp, vec![step("a", &[], false, &log)], RunOptions::default());
        let mut ui = MockUI::new();

        let report = runner.resume(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::NothingToRun);
        assert!(ui.has_warning("No saved session"));
    }

    #[test]
    fn resume_with_empty_pending_cleans_up() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(&temp, vec![step("a", &[], false, &log)], RunOptions::default());
        runner.store().save(&["a"]).unwrap();
        runner.store().update_progress("a").unwrap();
        let mut ui = MockUI::new();

        let report = runner.resume(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::NothingToRun);
        assert!(!runner.store().exists());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn resume_runs_only_pending_steps() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(
            &temp,
            vec![
                step("a", &[], false, &log),
                step("b", &[], false, &log),
                step("c", &[], false, &log),
            ],
            RunOptions::default(),
        );
        runner.store().save(&["a", "b", "c"]).unwrap();
        runner.store().update_progress("a").unwrap();
        let mut ui = MockUI::new();

        let report = runner.resume(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Success);
        assert_eq!(*log.borrow(), vec!["b", "c"]);
        assert!(!runner.store().exists());
    }

    #[test]
    fn resume_drops_steps_no_longer_configured() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut runner = runner(&temp, vec![step("a", &[], false, &log)], RunOptions::default());
        runner.store().save(&["gone", "a"]).unwrap();
        let mut ui = MockUI::new();

        let report = runner.resume(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Success);
        assert!(ui.has_warning("gone"));
        assert!(!runner.store().exists());
    }

    #[test]
    fn interrupt_keeps_session_and_reports_130() {
        let temp = TempDir::new().unwrap();
        let flag = InterruptFlag::detached();
        let trigger = flag.clone();
        let first = Step::builder("a")
            .action_fn(move |n| {
                trigger.trigger();
                Ok(StepResult::success(n, "ok", Duration::ZERO))
            })
            .build()
            .unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let executor =
            Executor::with_steps(false, vec![first, step("b", &[], false, &log)]).unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        let mut runner =
            SessionRunner::with_interrupt_flag(executor, store, RunOptions::default(), flag);
        let mut ui = MockUI::new();

        let report = runner.run_steps(&["a", "b"], &mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Interrupted);
        assert_eq!(report.outcome.exit_code(), 130);
        assert!(log.borrow().is_empty());
        let session = runner.store().load().unwrap().unwrap();
        assert_eq!(session.pending_steps, vec!["b"]);
    }

    fn interrupted_failure(flag: &InterruptFlag) -> Step {
        let trigger = flag.clone();
        Step::builder("a")
            .action_fn(move |n| {
                trigger.trigger();
                Ok(StepResult::failure(n, "terminated by SIGINT", "", Duration::ZERO))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn interrupt_during_failing_step_keeps_session() {
        let temp = TempDir::new().unwrap();
        let flag = InterruptFlag::detached();
        let log = Rc::new(RefCell::new(Vec::new()));
        let executor = Executor::with_steps(
            false,
            vec![interrupted_failure(&flag), step("b", &[], false, &log)],
        )
        .unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        let mut runner =
            SessionRunner::with_interrupt_flag(executor, store, RunOptions::default(), flag);
        let mut ui = MockUI::new();
        ui.set_interactive(true);

        let report = runner.run_steps(&["a", "b"], &mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Interrupted);
        assert_eq!(report.outcome.exit_code(), 130);
        assert!(ui.confirms_shown().is_empty());
        assert!(log.borrow().is_empty());
        let session = runner.store().load().unwrap().unwrap();
        assert_eq!(session.pending_steps, vec!["a", "b"]);
    }

    #[test]
    fn run_all_interrupt_during_failing_step_reports_130() {
        let temp = TempDir::new().unwrap();
        let flag = InterruptFlag::detached();
        let log = Rc::new(RefCell::new(Vec::new()));
        let executor = Executor::with_steps(
            false,
            vec![interrupted_failure(&flag), step("b", &[], false, &log)],
        )
        .unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        let mut runner =
            SessionRunner::with_interrupt_flag(executor, store, RunOptions::default(), flag);
        let mut ui = MockUI::new();

        let report = runner.run_all(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Interrupted);
        assert_eq!(report.outcome.exit_code(), 130);
        assert!(runner.store().exists());
    }

    #[test]
    fn dry_run_never_writes_session() {
        let temp = TempDir::new().unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let executor = Executor::with_steps(true, vec![step("a", &[], false, &log)]).unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        let mut runner = SessionRunner::with_interrupt_flag(
            executor,
            store,
            RunOptions::default(),
            InterruptFlag::detached(),
        );
        let mut ui = MockUI::new();

        let report = runner.run_all(&mut ui).unwrap();

        assert_eq!(report.outcome, RunOutcome::Success);
        assert!(log.borrow().is_empty());
        assert!(!runner.store().exists());
    }
}
