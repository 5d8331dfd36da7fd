//! Non-interactive UI for pipes, CI and other headless use.

use std::time::Duration;

use crate::error::Result;
use crate::runner::ExecutionSummary;
use crate::steps::format_duration;

use super::prompts::parse_answer;
use super::{summary_lines, DotstepTheme, Output, OutputMode, UserInterface};

/// Environment variable that answers every confirmation prompt.
pub const CONFIRM_ENV: &str = "DOTSTEP_CONFIRM";

/// UI implementation for non-interactive mode.
///
/// Status goes to stdout, warnings and errors to stderr. Confirmations
/// never block: they answer from `DOTSTEP_CONFIRM` or take the default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    out: Output,
    err: Output,
    theme: DotstepTheme,
    confirm_override: Option<String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self::with_confirm_override(mode, std::env::var(CONFIRM_ENV).ok())
    }

    /// Create with an explicit confirmation answer (for testing).
    pub fn with_confirm_override(mode: OutputMode, answer: Option<String>) -> Self {
        Self {
            mode,
            out: Output::stdout(),
            err: Output::stderr(),
            theme: DotstepTheme::plain(),
            confirm_override: answer,
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.out.line(msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.out.line(&self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        self.err.line(&self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        self.err.line(&self.theme.format_error(msg));
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            self.out.line(&format!("\n{}\n", self.theme.format_header(title)));
        }
    }

    fn step_started(&mut self, name: &str, index: usize, total: usize) {
        if self.mode.shows_status() {
            self.out
                .line(&format!("[{}/{}] Executing: {}", index, total, name));
        }
    }

    fn step_completed(&mut self, name: &str, duration: Duration) {
        if self.mode.shows_status() {
            self.out.line(
                &self
                    .theme
                    .format_success(&format!("{} ({})", name, format_duration(duration))),
            );
        }
    }

    fn step_failed(&mut self, name: &str, error: &str, duration: Duration) {
        self.err.line(&self.theme.format_error(&format!(
            "{} - {} ({})",
            name,
            error,
            format_duration(duration)
        )));
    }

    fn step_skipped(&mut self, name: &str, reason: Option<&str>) {
        if self.mode.shows_status() {
            let msg = match reason {
                Some(reason) => format!("{} - {}", name, reason),
                None => format!("{} - already satisfied", name),
            };
            self.out.line(&self.theme.format_skipped(&msg));
        }
    }

    fn show_summary(&mut self, summary: &ExecutionSummary) {
        self.out.line("");
        for line in summary_lines(summary) {
            self.out.line(&line);
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let answer = self
            .confirm_override
            .as_deref()
            .and_then(|v| parse_answer(v, default))
            .unwrap_or(default);
        tracing::debug!("Non-interactive confirm '{}' -> {}", question, answer);
        Ok(answer)
    }

    fn is_interactive(&self) -> bool {
        false
    }
}
