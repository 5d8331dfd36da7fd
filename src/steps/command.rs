//! Shell-command step action.
//!
//! [`CommandAction`] is the generic body behind configured steps: it runs one
//! command through the platform shell with a bounded timeout and turns the
//! outcome into a [`StepResult`].

use std::time::Duration;

use tracing::debug;

use crate::error::{DotstepError, Result};
use crate::shell::{execute, execute_check, CommandOptions};

use super::result::StepResult;
use super::step::StepAction;

/// Default timeout for a step command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a shell command as a step.
#[derive(Debug, Clone)]
pub struct CommandAction {
    command: String,
    expected_output: Option<String>,
    skip_if: Option<String>,
    timeout: Duration,
}

impl CommandAction {
    /// Create an action for a command with the default timeout.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            expected_output: None,
            skip_if: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Require stdout to contain this text for the step to succeed.
    pub fn expected_output(mut self, expected: impl Into<String>) -> Self {
        self.expected_output = Some(expected.into());
        self
    }

    /// Skip the step when this check command exits successfully.
    pub fn skip_if(mut self, check: impl Into<String>) -> Self {
        self.skip_if = Some(check.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl StepAction for CommandAction {
    fn should_skip(&mut self) -> bool {
        match &self.skip_if {
            Some(check) => {
                let done = execute_check(check, None);
                debug!("skip_if '{}' -> {}", check, done);
                done
            }
            None => false,
        }
    }

    fn pre_execute(&mut self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(DotstepError::ConfigValidationError {
                message: "Command cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    fn perform(&mut self, step_name: &str) -> Result<StepResult> {
        let options = CommandOptions {
            timeout: Some(self.timeout),
            ..Default::default()
        };
        let result = execute(&self.command, &options)?;

        if result.timed_out {
            return Ok(StepResult::failure(
                step_name,
                format!(
                    "Command timed out after {} seconds",
                    self.timeout.as_secs_f64()
                ),
                "",
                result.duration,
            )
            .with_context("command", self.command.as_str())
            .with_context("timeout", self.timeout.as_secs_f64()));
        }

        if !result.success {
            let code = result
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            return Ok(StepResult::failure(
                step_name,
                format!("Command failed with exit code {}", code),
                result.stdout,
                result.duration,
            )
            .with_context("command", self.command.as_str())
            .with_context("stderr", result.stderr)
            .with_context("exit_code", result.exit_code));
        }

        if let Some(expected) = &self.expected_output {
            if !result.stdout.contains(expected.as_str()) {
                return Ok(StepResult::failure(
                    step_name,
                    format!(
                        "Command succeeded but output didn't match expected: '{}'",
                        expected
                    ),
                    result.stdout,
                    result.duration,
                )
                .with_context("command", self.command.as_str())
                .with_context("stderr", result.stderr)
                .with_context("exit_code", result.exit_code));
            }
        }

        Ok(
            StepResult::success(step_name, result.stdout, result.duration)
                .with_context("command", self.command.as_str())
                .with_context("exit_code", result.exit_code),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{Step, StepStatus};

    fn step(action: CommandAction) -> Step {
        Step::builder("cmd").action(action).build().unwrap()
    }

    #[test]
    fn successful_command_completes() {
        let mut step = step(CommandAction::new("echo installed"));
        let result = step.execute();

        assert!(result.success);
        assert!(result.output.contains("installed"));
        assert_eq!(result.context["exit_code"], serde_json::Value::from(0));
        assert_eq!(step.status(), StepStatus::Completed);
    }

    #[test]
    fn non_zero_exit_fails() {
        let mut step = step(CommandAction::new("exit 4"));
        let result = step.execute();

        assert!(!result.success);
        assert_eq!(result.error_message(), "Command failed with exit code 4");
        assert_eq!(step.status(), StepStatus::Failed);
    }

    #[test]
    fn expected_output_mismatch_fails() {
        let mut step = step(CommandAction::new("echo 1.2.3").expected_output("2.0"));
        let result = step.execute();

        assert!(!result.success);
        assert!(result.error_message().contains("didn't match expected"));
    }

    #[test]
    fn expected_output_match_succeeds() {
        let mut step = step(CommandAction::new("echo git version 2.44").expected_output("git version"));
        assert!(step.execute().success);
    }

    #[test]
    fn empty_command_fails_validation() {
        let mut step = step(CommandAction::new("   "));
        let result = step.execute();

        assert!(!result.success);
        assert!(result.error_message().contains("Command cannot be empty"));
    }

    #[test]
    fn skip_if_success_skips() {
        let mut step = step(CommandAction::new("exit 1").skip_if("exit 0"));
        let result = step.execute();

        assert!(result.skipped);
        assert_eq!(step.status(), StepStatus::Skipped);
    }

    #[test]
    fn skip_if_failure_runs() {
        let mut step = step(CommandAction::new("echo ran").skip_if("exit 1"));
        let result = step.execute();

        assert!(!result.skipped);
        assert!(result.output.contains("ran"));
    }

    #[test]
    #[cfg(unix)]
    fn timeout_is_a_failing_result() {
        let mut step = step(CommandAction::new("sleep 5").timeout(Duration::from_millis(200)));
        let result = step.execute();

        assert!(!result.success);
        assert!(result.error_message().contains("timed out"));
        assert_eq!(step.status(), StepStatus::Failed);
    }
}
