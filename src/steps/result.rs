//! Step outcome records.

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use super::step::StepStatus;

/// Free-form diagnostic data attached to a result.
pub type StepContext = BTreeMap<String, Value>;

/// Outcome of one execution attempt of a step.
///
/// Results are produced once per attempt, including attempts triggered as a
/// dependency of another step, and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the step succeeded.
    pub success: bool,

    /// Captured output.
    pub output: String,

    /// Error message, present iff the step failed.
    pub error: Option<String>,

    /// Name of the step that produced this result.
    pub step_name: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the step was skipped.
    pub skipped: bool,

    /// Diagnostic data (command, exit code, ...).
    pub context: StepContext,
}

impl StepResult {
    /// Create a success result.
    pub fn success(step_name: &str, output: impl Into<String>, duration: Duration) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            step_name: step_name.to_string(),
            duration,
            skipped: false,
            context: StepContext::new(),
        }
    }

    /// Create a failure result.
    pub fn failure(
        step_name: &str,
        error: impl Into<String>,
        output: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: Some(error.into()),
            step_name: step_name.to_string(),
            duration,
            skipped: false,
            context: StepContext::new(),
        }
    }

    /// Create a skipped result. Skips count as successful.
    pub fn skipped(step_name: &str) -> Self {
        Self {
            success: true,
            output: "Step skipped".to_string(),
            error: None,
            step_name: step_name.to_string(),
            duration: Duration::ZERO,
            skipped: true,
            context: StepContext::new(),
        }
    }

    /// Attach a context entry.
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// Whether the step failed.
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Whether this result was synthesized by a dry run.
    pub fn is_dry_run(&self) -> bool {
        self.context
            .get("dry_run")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Error text, or empty when there is none.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }

    /// Duration in fractional seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// Get the status this result implies.
    pub fn status(&self) -> StepStatus {
        if self.skipped {
            StepStatus::Skipped
        } else if self.success {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        }
    }

    /// Generate a summary line for display.
    pub fn summary_line(&self) -> String {
        let status = self.status();
        match status {
            StepStatus::Completed => format!(
                "{} {} ({})",
                status.display_char(),
                self.step_name,
                format_duration(self.duration)
            ),
            StepStatus::Skipped => format!("{} {} (skipped)", status.display_char(), self.step_name),
            StepStatus::Failed => {
                let error = self.error.as_deref().unwrap_or("unknown error");
                format!("{} {} - {}", status.display_char(), self.step_name, error)
            }
            _ => format!("{} {}", status.display_char(), self.step_name),
        }
    }
}

/// Format a duration for display: `250ms`, `4.2s`, `1m 5s`.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_has_no_error() {
        let result = StepResult::success("fonts", "installed", Duration::from_millis(10));
        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.error_message(), "");
        assert_eq!(result.status(), StepStatus::Completed);
    }

    #[test]
    fn failure_carries_error() {
        let result = StepResult::failure("fonts", "no network", "", Duration::ZERO);
        assert!(result.is_failure());
        assert_eq!(result.error_message(), "no network");
        assert_eq!(result.status(), StepStatus::Failed);
    }

    #[test]
    fn skipped_counts_as_success() {
        let result = StepResult::skipped("fonts");
        assert!(result.success);
        assert!(result.skipped);
        assert_eq!(result.duration, Duration::ZERO);
        assert_eq!(result.output, "Step skipped");
        assert_eq!(result.status(), StepStatus::Skipped);
    }

    #[test]
    fn with_context_records_entries() {
        let result = StepResult::success("git", "", Duration::ZERO)
            .with_context("exit_code", 0)
            .with_context("command", "git --version");
        assert_eq!(result.context["exit_code"], Value::from(0));
        assert_eq!(result.context["command"], Value::from("git --version"));
    }

    #[test]
    fn summary_line_includes_status_icon() {
        let ok = StepResult::success("bat", "", Duration::from_secs(1));
        assert!(ok.summary_line().contains('✓'));

        let failed = StepResult::failure("bat", "exit 1", "", Duration::ZERO);
        let line = failed.summary_line();
        assert!(line.contains('✗'));
        assert!(line.contains("exit 1"));
    }

    #[test]
    fn format_duration_formats_correctly() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.0s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }
}
