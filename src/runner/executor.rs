//! Step execution orchestration.
//!
//! The [`Executor`] owns the registered steps and the log of every
//! [`StepResult`] produced, and exposes two modes: run everything in
//! dependency order ([`Executor::execute_all`]) or run one named step after its
//! prerequisites ([`Executor::execute_step`]).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{DotstepError, Result};
use crate::steps::{Step, StepResult};
use crate::ui::UserInterface;

use super::dependency::{DependencyResolver, MissingDependency, Resolution};
use super::interrupt::InterruptFlag;

/// Which prerequisites [`Executor::execute_step`] runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    /// Only the step's own dependencies.
    #[default]
    Direct,
    /// Dependencies of dependencies too, ordered by the resolver.
    Transitive,
}

impl std::str::FromStr for DependencyScope {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "transitive" => Ok(Self::Transitive),
            _ => Err(format!("unknown dependency scope: {}", s)),
        }
    }
}

/// A failed step and its error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    pub step_name: String,
    pub error: String,
}

/// Aggregate counts over a result log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionSummary {
    /// Number of results.
    pub total: usize,
    /// Results with `success` set (skips included).
    pub successful: usize,
    /// Failed results.
    pub failed: usize,
    /// Skipped results.
    pub skipped: usize,
    /// Sum of all recorded durations.
    pub total_duration: Duration,
    /// One entry per failed result.
    pub failures: Vec<FailureDetail>,
    /// Whether the run stopped because the user interrupted it.
    pub interrupted: bool,
}

impl ExecutionSummary {
    /// Summarize a result log.
    pub fn from_results(results: &[StepResult]) -> Self {
        let failures = results
            .iter()
            .filter(|r| r.is_failure())
            .map(|r| FailureDetail {
                step_name: r.step_name.clone(),
                error: r.error_message().to_string(),
            })
            .collect::<Vec<_>>();

        Self {
            total: results.len(),
            successful: results.iter().filter(|r| r.success).count(),
            failed: failures.len(),
            skipped: results.iter().filter(|r| r.skipped).count(),
            total_duration: results.iter().map(|r| r.duration).sum(),
            failures,
            interrupted: false,
        }
    }

    /// True when nothing failed and the run was not interrupted.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }
}

/// Owns the registered steps and runs them.
pub struct Executor {
    steps: Vec<Step>,
    results: Vec<StepResult>,
    dry_run: bool,
    dependency_scope: DependencyScope,
    interrupt: InterruptFlag,
}

impl Executor {
    /// Create an empty executor.
    pub fn new(dry_run: bool) -> Self {
        Self {
            steps: Vec::new(),
            results: Vec::new(),
            dry_run,
            dependency_scope: DependencyScope::default(),
            interrupt: InterruptFlag::detached(),
        }
    }

    /// Create an executor with an initial set of steps.
    pub fn with_steps(dry_run: bool, steps: impl IntoIterator<Item = Step>) -> Result<Self> {
        let mut executor = Self::new(dry_run);
        for step in steps {
            executor.add_step(step)?;
        }
        Ok(executor)
    }

    pub fn set_dependency_scope(&mut self, scope: DependencyScope) {
        self.dependency_scope = scope;
    }

    /// Use this flag to stop runs between steps.
    pub fn set_interrupt_flag(&mut self, flag: InterruptFlag) {
        self.interrupt = flag;
    }

    /// Register a step. Names must be unique.
    pub fn add_step(&mut self, step: Step) -> Result<()> {
        if self.index_of(step.name()).is_some() {
            return Err(DotstepError::DuplicateStep {
                name: step.name().to_string(),
            });
        }
        debug!("Registered step '{}'", step.name());
        self.steps.push(step);
        Ok(())
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Registered steps, in registration order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Look up a registered step by name.
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name() == name)
    }

    /// Every result produced so far, in production order.
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn clear_results(&mut self) {
        self.results.clear();
    }

    pub fn successful_results(&self) -> Vec<&StepResult> {
        self.results.iter().filter(|r| r.success).collect()
    }

    pub fn failed_results(&self) -> Vec<&StepResult> {
        self.results.iter().filter(|r| r.is_failure()).collect()
    }

    pub fn skipped_results(&self) -> Vec<&StepResult> {
        self.results.iter().filter(|r| r.skipped).collect()
    }

    /// Summarize the result log.
    pub fn summary(&self) -> ExecutionSummary {
        ExecutionSummary::from_results(&self.results)
    }

    /// Run every registered step in dependency order.
    pub fn execute_all(&mut self, ui: &mut dyn UserInterface) -> Result<ExecutionSummary> {
        self.execute_all_with(ui, |_, _| {})
    }

    /// Run every registered step in dependency order, calling `on_result`
    /// after each step finishes.
    ///
    /// Stops after the first failure of a non-optional step. A dependency
    /// cycle aborts before anything runs.
    pub fn execute_all_with(
        &mut self,
        ui: &mut dyn UserInterface,
        mut on_result: impl FnMut(&str, &StepResult),
    ) -> Result<ExecutionSummary> {
        let resolution = DependencyResolver::new(&self.steps).resolve()?;
        report_missing(&resolution.missing, ui);

        let total = resolution.order.len();
        let mut interrupted = false;

        for (position, &idx) in resolution.order.iter().enumerate() {
            if self.interrupt.is_set() {
                warn!("Run interrupted before step '{}'", self.steps[idx].name());
                interrupted = true;
                break;
            }

            let name = self.steps[idx].name().to_string();
            ui.step_started(&name, position + 1, total);

            let result = self.run_one(idx);
            report_result(&name, &result, ui);
            on_result(&name, &result);

            let halt = result.is_failure() && !self.steps[idx].is_optional();
            self.results.push(result);

            // A Ctrl-C during the step usually surfaces as its failure.
            if self.interrupt.is_set() {
                warn!("Run interrupted during step '{}'", name);
                interrupted = true;
                break;
            }

            if halt {
                ui.error(&format!("Critical step failed: {}", name));
                info!("Stopping run after critical failure of '{}'", name);
                break;
            }
        }

        let mut summary = self.summary();
        summary.interrupted = interrupted;
        Ok(summary)
    }

    /// Run one step after its unfinished prerequisites.
    ///
    /// Returns `Ok(None)` for an unknown name. If a prerequisite fails, its
    /// result is returned and the named step does not run.
    pub fn execute_step(
        &mut self,
        name: &str,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<StepResult>> {
        let Some(idx) = self.index_of(name) else {
            debug!("execute_step: no step named '{}'", name);
            return Ok(None);
        };

        let resolution = self.prerequisites(idx)?;
        report_missing(&resolution.missing, ui);

        for dep_idx in resolution.order {
            if self.steps[dep_idx].is_completed() {
                continue;
            }

            let dep_name = self.steps[dep_idx].name().to_string();
            ui.message(&format!("Executing dependency: {}", dep_name));

            let result = self.run_one(dep_idx);
            self.results.push(result.clone());

            if result.is_failure() {
                ui.error(&format!("Dependency failed: {}", dep_name));
                return Ok(Some(result));
            }
        }

        let result = self.run_one(idx);
        self.results.push(result.clone());
        Ok(Some(result))
    }

    fn prerequisites(&self, idx: usize) -> Result<Resolution> {
        let resolver = DependencyResolver::new(&self.steps);
        match self.dependency_scope {
            DependencyScope::Direct => Ok(resolver.direct_dependencies_of(idx)),
            DependencyScope::Transitive => resolver.resolve_dependencies_of(idx),
        }
    }

    fn run_one(&mut self, idx: usize) -> StepResult {
        let step = &mut self.steps[idx];
        if self.dry_run {
            debug!("Dry run of '{}'", step.name());
            return StepResult::success(
                step.name(),
                format!("[DRY RUN] Would execute: {}", step.description()),
                Duration::ZERO,
            )
            .with_context("dry_run", true);
        }
        step.execute()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.name() == name)
    }
}

fn report_missing(missing: &[MissingDependency], ui: &mut dyn UserInterface) {
    for m in missing {
        warn!("{}", m.warning());
        ui.warning(&format!("Warning: {}", m.warning()));
    }
}

pub(crate) fn report_result(name: &str, result: &StepResult, ui: &mut dyn UserInterface) {
    if result.is_dry_run() {
        ui.message(&result.output);
    }
    if result.skipped {
        ui.step_skipped(name, None);
    } else if result.success {
        ui.step_completed(name, result.duration);
    } else {
        ui.step_failed(name, result.error_message(), result.duration);
    }
}
