//! Interactive terminal UI.

use console::Term;
use std::time::Duration;

use crate::error::Result;
use crate::runner::ExecutionSummary;
use crate::steps::format_duration;

use super::{
    prompt_confirm, should_use_colors, summary_lines, DotstepTheme, NonInteractiveUI, Output,
    OutputMode, RunProgress, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    out: Output,
    theme: DotstepTheme,
    mode: OutputMode,
    progress: Option<RunProgress>,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, use_color: bool) -> Self {
        Self {
            term: Term::stdout(),
            out: Output::stdout(),
            theme: DotstepTheme::for_color(use_color && should_use_colors()),
            mode,
            progress: None,
        }
    }

    fn line(&self, text: &str) {
        match &self.progress {
            Some(progress) => progress.suspend(|| self.out.line(text)),
            None => self.out.line(text),
        }
    }

    fn finish_step(&mut self) {
        let done = match &self.progress {
            Some(progress) => {
                progress.finish_step();
                progress.is_complete()
            }
            None => false,
        };
        if done {
            self.clear_progress();
        }
    }

    fn clear_progress(&mut self) {
        if let Some(progress) = self.progress.take() {
            progress.finish();
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.line(msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            self.line(&self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        self.line(&self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        self.line(&self.theme.format_error(msg));
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            self.line("");
            self.line(&self.theme.format_header(title));
        }
    }

    fn step_started(&mut self, name: &str, index: usize, total: usize) {
        if !self.mode.shows_status() {
            return;
        }
        let fresh = index <= 1
            || self
                .progress
                .as_ref()
                .and_then(|p| p.length())
                .map_or(true, |len| len != total as u64);
        if fresh {
            self.clear_progress();
            self.progress = Some(RunProgress::new(total));
        }
        if let Some(progress) = &self.progress {
            progress.start_step(name, index);
        }
    }

    fn step_completed(&mut self, name: &str, duration: Duration) {
        if self.mode.shows_status() {
            let msg = format!(
                "{} {}",
                name,
                self.theme.duration.apply_to(format_duration(duration))
            );
            self.line(&self.theme.format_success(&msg));
        }
        self.finish_step();
    }

    fn step_failed(&mut self, name: &str, error: &str, duration: Duration) {
        let msg = format!(
            "{} - {} {}",
            name,
            error,
            self.theme.duration.apply_to(format_duration(duration))
        );
        self.line(&self.theme.format_error(&msg));
        self.finish_step();
    }

    fn step_skipped(&mut self, name: &str, reason: Option<&str>) {
        if self.mode.shows_status() {
            let msg = match reason {
                Some(reason) => format!("{} - {}", name, reason),
                None => format!("{} - already satisfied", name),
            };
            self.line(&self.theme.format_skipped(&msg));
        }
        self.finish_step();
    }

    fn show_summary(&mut self, summary: &ExecutionSummary) {
        self.clear_progress();
        self.line("");
        for (i, line) in summary_lines(summary).into_iter().enumerate() {
            if i == 0 {
                self.line(&self.theme.highlight.apply_to(line).to_string());
            } else {
                self.line(&self.theme.error.apply_to(line).to_string());
            }
        }
        if summary.is_success() {
            self.line(&self.theme.format_success("All steps finished"));
        }
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let progress = self.progress.take();
        let answer = match &progress {
            Some(p) => p.suspend(|| prompt_confirm(question, default, &self.term)),
            None => prompt_confirm(question, default, &self.term),
        };
        self.progress = progress;
        answer
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        self.clear_progress();
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode, use_color: bool) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode, use_color))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
