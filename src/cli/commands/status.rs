//! Session status and abandon commands.
//!
//! `dotstep status` shows the saved session's checkpoint; `dotstep abandon`
//! deletes it.

use crate::error::Result;
use crate::session::Session;
use crate::ui::UserInterface;

use super::dispatcher::{AppContext, Command, CommandResult, CONFIG_EXIT_CODE};

/// The status command implementation.
pub struct StatusCommand {
    ctx: AppContext,
}

impl StatusCommand {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.ctx.load_config_or_report(ui)? else {
            return Ok(CommandResult::failure(CONFIG_EXIT_CODE));
        };
        let store = self.ctx.session_store(&config);

        ui.show_header("Session status");
        match store.load()? {
            None => ui.message("No saved session."),
            Some(session) => {
                for line in describe_session(&session) {
                    ui.message(&line);
                }
                if !session.is_finished() {
                    ui.message("Run `dotstep resume` to continue.");
                }
            }
        }

        Ok(CommandResult::success())
    }
}

/// Human-readable lines describing a session.
pub fn describe_session(session: &Session) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Started: {}",
            session.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        format!(
            "Progress: {} of {} steps completed",
            session.completed_steps.len(),
            session.selected_steps.len()
        ),
    ];
    if !session.completed_steps.is_empty() {
        lines.push(format!("Completed: {}", session.completed_steps.join(", ")));
    }
    if !session.pending_steps.is_empty() {
        lines.push(format!("Pending: {}", session.pending_steps.join(", ")));
    }
    lines
}

/// The abandon command implementation.
pub struct AbandonCommand {
    ctx: AppContext,
}

impl AbandonCommand {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

impl Command for AbandonCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.ctx.load_config_or_report(ui)? else {
            return Ok(CommandResult::failure(CONFIG_EXIT_CODE));
        };
        let store = self.ctx.session_store(&config);

        if !store.exists() {
            ui.message("No saved session.");
            return Ok(CommandResult::success());
        }

        store.cleanup()?;
        ui.success("Saved session removed");
        Ok(CommandResult::success())
    }
}
