//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. Confirmation answers can be queued.
//!
//! # Example
//!
//! ```
//! use dotstep::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.queue_confirm_responses(vec![false]);
//!
//! ui.message("Starting setup");
//! assert!(!ui.confirm("Continue with remaining steps?", true).unwrap());
//!
//! assert!(ui.has_message("Starting setup"));
//! assert_eq!(ui.confirms_shown(), &["Continue with remaining steps?".to_string()]);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::Result;
use crate::runner::ExecutionSummary;

use super::{OutputMode, UserInterface};

/// Mock UI implementation for testing.
///
/// Unanswered confirmations return the prompt's default.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    started: Vec<(String, usize, usize)>,
    completed: Vec<String>,
    failed: Vec<(String, String)>,
    skipped: Vec<String>,
    summaries: Vec<ExecutionSummary>,
    confirm_queue: VecDeque<bool>,
    confirms_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Queue answers for successive `confirm` calls.
    pub fn queue_confirm_responses(&mut self, responses: Vec<bool>) {
        self.confirm_queue.extend(responses);
    }

    /// Set whether this mock behaves as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Step starts as `(name, index, total)`.
    pub fn started(&self) -> &[(String, usize, usize)] {
        &self.started
    }

    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    /// Step failures as `(name, error)`.
    pub fn failed(&self) -> &[(String, String)] {
        &self.failed
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn summaries(&self) -> &[ExecutionSummary] {
        &self.summaries
    }

    /// Questions passed to `confirm`, in order.
    pub fn confirms_shown(&self) -> &[String] {
        &self.confirms_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    /// The most recent summary, if any.
    pub fn last_summary(&self) -> Option<&ExecutionSummary> {
        self.summaries.last()
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn step_started(&mut self, name: &str, index: usize, total: usize) {
        self.started.push((name.to_string(), index, total));
    }

    fn step_completed(&mut self, name: &str, _duration: Duration) {
        self.completed.push(name.to_string());
    }

    fn step_failed(&mut self, name: &str, error: &str, _duration: Duration) {
        self.failed.push((name.to_string(), error.to_string()));
    }

    fn step_skipped(&mut self, name: &str, _reason: Option<&str>) {
        self.skipped.push(name.to_string());
    }

    fn show_summary(&mut self, summary: &ExecutionSummary) {
        self.summaries.push(summary.clone());
    }

    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        self.confirms_shown.push(question.to_string());
        Ok(self.confirm_queue.pop_front().unwrap_or(default))
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}
