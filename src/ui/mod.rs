//! User-facing presentation.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for pipes, CI and other headless use
//! - [`MockUI`] for capturing interactions in tests
//!
//! # Example
//!
//! ```
//! use dotstep::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet, false);
//! ui.show_header("Dotfiles");
//! ui.success("Setup complete!");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::{Output, OutputMode};
pub use progress::RunProgress;
pub use prompts::prompt_confirm;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, DotstepTheme};

use std::time::Duration;

use crate::error::Result;
use crate::runner::ExecutionSummary;

/// Trait for user interface interactions.
///
/// Runners talk only to this trait so tests can substitute [`MockUI`].
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// A step is about to run. `index` is 1-based.
    fn step_started(&mut self, name: &str, index: usize, total: usize);

    /// A step finished successfully.
    fn step_completed(&mut self, name: &str, duration: Duration);

    /// A step failed.
    fn step_failed(&mut self, name: &str, error: &str, duration: Duration);

    /// A step was skipped.
    fn step_skipped(&mut self, name: &str, reason: Option<&str>);

    /// Show the end-of-run summary.
    fn show_summary(&mut self, summary: &ExecutionSummary);

    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Summary lines shared by the concrete UIs.
pub(crate) fn summary_lines(summary: &ExecutionSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Total: {} · {} succeeded · {} failed · {} skipped · {}",
        summary.total,
        summary.successful,
        summary.failed,
        summary.skipped,
        crate::steps::format_duration(summary.total_duration)
    )];
    for failure in &summary.failures {
        lines.push(format!("  {}: {}", failure.step_name, failure.error));
    }
    if summary.interrupted {
        lines.push("Run interrupted; progress has been saved.".to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::FailureDetail;

    #[test]
    fn summary_lines_include_counts() {
        let summary = ExecutionSummary {
            total: 3,
            successful: 2,
            failed: 1,
            skipped: 0,
            total_duration: Duration::from_millis(1500),
            failures: vec![FailureDetail {
                step_name: "fonts".to_string(),
                error: "Command failed with exit code 1".to_string(),
            }],
            interrupted: false,
        };
        let lines = summary_lines(&summary);
        assert!(lines[0].contains("3"));
        assert!(lines[0].contains("1.5s"));
        assert!(lines[1].contains("fonts: Command failed"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn summary_lines_mention_interrupt() {
        let summary = ExecutionSummary {
            interrupted: true,
            ..Default::default()
        };
        let lines = summary_lines(&summary);
        assert!(lines.iter().any(|l| l.contains("interrupted")));
    }
}
