//! List command implementation.
//!
//! The `dotstep list` command lists steps grouped by category, with their
//! dependencies and, when a session is saved, their progress in it.

use std::collections::HashSet;

use crate::config::DotstepConfig;
use crate::error::Result;
use crate::session::Session;
use crate::ui::{should_use_colors, DotstepTheme, UserInterface};

use super::dispatcher::{AppContext, Command, CommandResult, CONFIG_EXIT_CODE};

/// The list command implementation.
pub struct ListCommand {
    ctx: AppContext,
}

impl ListCommand {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.ctx.load_config_or_report(ui)? else {
            return Ok(CommandResult::failure(CONFIG_EXIT_CODE));
        };

        let session = self.ctx.session_store(&config).load()?;
        let theme = DotstepTheme::for_color(config.settings.use_color && should_use_colors());

        for line in render_listing(&config, session.as_ref(), &theme) {
            ui.message(&line);
        }

        Ok(CommandResult::success())
    }
}

/// Render the category listing as display lines.
pub fn render_listing(
    config: &DotstepConfig,
    session: Option<&Session>,
    theme: &DotstepTheme,
) -> Vec<String> {
    let completed: HashSet<&str> = session
        .map(|s| s.completed_steps.iter().map(String::as_str).collect())
        .unwrap_or_default();
    let pending: HashSet<&str> = session
        .map(|s| s.pending_steps.iter().map(String::as_str).collect())
        .unwrap_or_default();

    let mut lines = Vec::new();
    for category in &config.categories {
        lines.push(format!("{}", theme.category.apply_to(&category.name)));

        for step in &category.steps {
            let marker = if completed.contains(step.name.as_str()) {
                theme.success.apply_to("✓").to_string()
            } else if pending.contains(step.name.as_str()) {
                theme.info.apply_to("…").to_string()
            } else {
                theme.dim.apply_to("•").to_string()
            };

            let mut line = format!("  {} {}", marker, theme.highlight.apply_to(&step.name));
            if step.optional {
                line.push_str(&format!(" {}", theme.dim.apply_to("(optional)")));
            }
            if let Some(description) = &step.description {
                line.push_str(&format!(" {} {}", theme.dim.apply_to("-"), description));
            }
            lines.push(line);

            if !step.depends_on.is_empty() {
                lines.push(format!(
                    "      {} {}",
                    theme.dim.apply_to("└── depends on:"),
                    theme.dim.apply_to(step.depends_on.join(", "))
                ));
            }
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "{} steps in {} categories",
        config.step_count(),
        config.categories.len()
    ));
    lines
}
