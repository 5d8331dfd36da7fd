//! The step state machine.
//!
//! A [`Step`] pairs a fixed descriptor (name, description, dependencies,
//! optional flag) with a [`StepAction`] that does the actual work. Only
//! [`Step::execute`] mutates a step after construction, and only its status
//! and timestamps.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{DotstepError, Result};

use super::result::StepResult;

/// Lifecycle status of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepStatus {
    /// Step has not run yet.
    #[default]
    Pending,

    /// Step is currently executing.
    Running,

    /// Step completed successfully.
    Completed,

    /// Step failed.
    Failed,

    /// Step was skipped because its skip condition held.
    Skipped,
}

impl StepStatus {
    /// Check if this is a terminal state for the current invocation.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Failed | StepStatus::Skipped
        )
    }

    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Pending => '○',
            StepStatus::Running => '◉',
            StepStatus::Completed => '✓',
            StepStatus::Failed => '✗',
            StepStatus::Skipped => '⊘',
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// The work a step performs.
///
/// Only [`perform`](StepAction::perform) is required. An `Err` from any hook
/// marks the step failed with the error text; it never escapes
/// [`Step::execute`].
pub trait StepAction {
    /// Run the step's core action.
    fn perform(&mut self, step_name: &str) -> Result<StepResult>;

    /// Return true to skip the step without running it.
    fn should_skip(&mut self) -> bool {
        false
    }

    /// Validation run before [`perform`](StepAction::perform).
    fn pre_execute(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called with the result of a successful [`perform`](StepAction::perform) call.
    fn post_execute(&mut self, _result: &StepResult) -> Result<()> {
        Ok(())
    }
}

/// A [`StepAction`] backed by a closure.
pub struct FnAction<F>(F);

impl<F> FnAction<F>
where
    F: FnMut(&str) -> Result<StepResult>,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> StepAction for FnAction<F>
where
    F: FnMut(&str) -> Result<StepResult>,
{
    fn perform(&mut self, step_name: &str) -> Result<StepResult> {
        (self.0)(step_name)
    }
}

/// A named unit of work with a lifecycle and dependencies.
pub struct Step {
    name: String,
    description: String,
    dependencies: Vec<String>,
    category: Option<String>,
    optional: bool,
    status: StepStatus,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    action: Box<dyn StepAction>,
}

impl Step {
    /// Start building a step.
    pub fn builder(name: impl Into<String>) -> StepBuilder {
        StepBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Names of steps that must run first. May name unregistered steps.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Whether a failure of this step lets a full run continue.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.status == StepStatus::Failed
    }

    /// Time between start and end of the latest invocation, zero if either is unset.
    pub fn execution_duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end
                .signed_duration_since(start)
                .to_std()
                .unwrap_or(Duration::ZERO),
            _ => Duration::ZERO,
        }
    }

    /// Execute the step, converting any action error into a failing result.
    ///
    /// Status and timestamps always describe this invocation only.
    pub fn execute(&mut self) -> StepResult {
        if self.action.should_skip() {
            debug!("Step '{}' skipped", self.name);
            self.status = StepStatus::Skipped;
            self.start_time = None;
            self.end_time = None;
            return StepResult::skipped(&self.name);
        }

        self.start_time = Some(Utc::now());
        self.end_time = None;
        self.status = StepStatus::Running;
        debug!("Step '{}' running", self.name);

        match self.run_action() {
            Ok(result) => {
                self.status = if result.success {
                    StepStatus::Completed
                } else {
                    StepStatus::Failed
                };
                self.end_time = Some(Utc::now());
                debug!("Step '{}' finished: {}", self.name, self.status);
                result
            }
            Err(e) => {
                self.status = StepStatus::Failed;
                self.end_time = Some(Utc::now());
                debug!("Step '{}' raised: {}", self.name, e);
                StepResult::failure(&self.name, e.to_string(), "", self.execution_duration())
            }
        }
    }

    fn run_action(&mut self) -> Result<StepResult> {
        self.action.pre_execute()?;
        let result = self.action.perform(&self.name)?;
        self.action.post_execute(&result)?;
        Ok(result)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("dependencies", &self.dependencies)
            .field("optional", &self.optional)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Step`].
pub struct StepBuilder {
    name: String,
    description: Option<String>,
    dependencies: Vec<String>,
    category: Option<String>,
    optional: bool,
    action: Option<Box<dyn StepAction>>,
}

impl StepBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            dependencies: Vec::new(),
            category: None,
            optional: false,
            action: None,
        }
    }

    /// Human-readable description. Defaults to "Execute <name>".
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a dependency by step name.
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(name.into());
        self
    }

    /// Replace the dependency list.
    pub fn dependencies<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Set the action.
    pub fn action(mut self, action: impl StepAction + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Set the action from a closure.
    pub fn action_fn<F>(self, f: F) -> Self
    where
        F: FnMut(&str) -> Result<StepResult> + 'static,
    {
        self.action(FnAction::new(f))
    }

    /// Build the step.
    pub fn build(self) -> Result<Step> {
        if self.name.trim().is_empty() {
            return Err(DotstepError::ConfigValidationError {
                message: "step name cannot be empty".to_string(),
            });
        }

        let action = self
            .action
            .ok_or_else(|| DotstepError::ConfigValidationError {
                message: format!("step '{}' has no action", self.name),
            })?;

        let description = self
            .description
            .unwrap_or_else(|| format!("Execute {}", self.name));

        Ok(Step {
            name: self.name,
            description,
            dependencies: self.dependencies,
            category: self.category,
            optional: self.optional,
            status: StepStatus::Pending,
            start_time: None,
            end_time: None,
            action,
        })
    }
}
