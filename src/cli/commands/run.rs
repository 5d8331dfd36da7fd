//! Run commands: `all`, `steps` and `resume`.

use tracing::{debug, info};

use crate::config::build_steps;
use crate::error::Result;
use crate::runner::{Executor, RunOptions, SessionRunner};
use crate::ui::UserInterface;

use super::dispatcher::{AppContext, Command, CommandResult, CONFIG_EXIT_CODE};

/// Which steps a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Every configured step.
    All,
    /// The named steps.
    Steps(Vec<String>),
    /// The saved session's pending steps.
    Resume,
}

/// The run command implementation.
pub struct RunCommand {
    ctx: AppContext,
    mode: RunMode,
}

impl RunCommand {
    pub fn new(ctx: AppContext, mode: RunMode) -> Self {
        Self { ctx, mode }
    }

    pub fn mode(&self) -> &RunMode {
        &self.mode
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.ctx.load_config_or_report(ui)? else {
            return Ok(CommandResult::failure(CONFIG_EXIT_CODE));
        };

        let dry_run = self.ctx.is_dry_run(&config);
        if dry_run {
            ui.warning("Dry run: no commands will be executed");
        }

        let mut executor = Executor::with_steps(dry_run, build_steps(&config)?)?;
        executor.set_dependency_scope(config.settings.dependency_scope);

        let options = RunOptions {
            continue_on_error: config.settings.continue_on_error,
            assume_yes: self.ctx.assume_yes,
        };
        let store = self.ctx.session_store(&config);
        debug!("Session file: {}", store.path().display());

        let mut runner = SessionRunner::new(executor, store, options);
        let report = match &self.mode {
            RunMode::All => runner.run_all(ui)?,
            RunMode::Steps(names) => runner.run_steps(names, ui)?,
            RunMode::Resume => runner.resume(ui)?,
        };

        info!("Run finished: {:?}", report.outcome);
        Ok(CommandResult::from_exit_code(report.outcome.exit_code()))
    }
}
