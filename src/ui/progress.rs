//! Run-level progress bar.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.cyan} [{pos}/{len}] {bar:24.cyan/dim} {msg}";

/// Progress bar counting finished steps in a run.
///
/// Hidden bars accept every call and draw nothing, so callers never branch
/// on whether progress is visible.
pub struct RunProgress {
    bar: ProgressBar,
}

impl RunProgress {
    /// Create a visible bar for `total` steps.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    /// Create a bar that never draws.
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    /// Show which step is running. `index` is 1-based.
    pub fn start_step(&self, name: &str, index: usize) {
        self.bar.set_position(index.saturating_sub(1) as u64);
        self.bar.set_message(format!("Executing: {}", name));
    }

    /// Count one step as done.
    pub fn finish_step(&self) {
        self.bar.inc(1);
    }

    /// Run `f` with the bar temporarily cleared from the terminal.
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.bar.suspend(f)
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    /// True once every step has been counted.
    pub fn is_complete(&self) -> bool {
        self.length().is_some_and(|len| self.position() >= len)
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
