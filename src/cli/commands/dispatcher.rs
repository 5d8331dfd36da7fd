//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`AppContext`] for state shared by every command
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, session_path, DotstepConfig, PROJECT_CONFIG_FILE};
use crate::error::{DotstepError, Result};
use crate::session::SessionStore;
use crate::ui::UserInterface;

/// Exit status when no usable configuration exists.
pub const CONFIG_EXIT_CODE: i32 = 2;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Result carrying a process exit status.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::success()
        } else {
            Self::failure(exit_code)
        }
    }
}

/// Global options every command sees.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// Directory searched for `dotstep.yml`.
    pub cwd: PathBuf,
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Explicit session file.
    pub session_file: Option<PathBuf>,
    /// Dry run requested on the command line.
    pub dry_run: bool,
    /// Continue after failures without asking.
    pub assume_yes: bool,
}

impl AppContext {
    /// Build the context from parsed arguments.
    pub fn from_cli(cli: &Cli, cwd: PathBuf) -> Self {
        Self {
            cwd,
            config: cli.config.clone(),
            session_file: cli.session_file.clone(),
            dry_run: cli.dry_run,
            assume_yes: cli.yes,
        }
    }

    /// Load and validate the configuration.
    pub fn load_config(&self) -> Result<DotstepConfig> {
        let (path, config) = load_config(self.config.as_deref(), &self.cwd)?;
        debug!("Using config {}", path.display());
        Ok(config)
    }

    /// Load the configuration, reporting a missing file to the user.
    ///
    /// Returns `Ok(None)` when no configuration was found.
    pub fn load_config_or_report(
        &self,
        ui: &mut dyn UserInterface,
    ) -> Result<Option<DotstepConfig>> {
        match self.load_config() {
            Ok(config) => Ok(Some(config)),
            Err(DotstepError::ConfigNotFound { path }) => {
                ui.error(&format!(
                    "No configuration found at {}. Create {} or pass --config.",
                    path.display(),
                    PROJECT_CONFIG_FILE
                ));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Session store for the given configuration.
    pub fn session_store(&self, config: &DotstepConfig) -> SessionStore {
        match &self.session_file {
            Some(path) => SessionStore::new(path),
            None => SessionStore::new(session_path(&config.settings)),
        }
    }

    /// Whether this invocation is a dry run.
    pub fn is_dry_run(&self, config: &DotstepConfig) -> bool {
        self.dry_run || config.settings.dry_run
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: AppContext,
}

impl CommandDispatcher {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Working directory used for config discovery.
    pub fn cwd(&self) -> &Path {
        &self.context.cwd
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.context.clone();
        match &cli.command {
            Some(Commands::List) | None => super::list::ListCommand::new(ctx).execute(ui),
            Some(Commands::Status) => super::status::StatusCommand::new(ctx).execute(ui),
            Some(Commands::All) => {
                super::run::RunCommand::new(ctx, super::run::RunMode::All).execute(ui)
            }
            Some(Commands::Steps(args)) => super::run::RunCommand::new(
                ctx,
                super::run::RunMode::Steps(args.names.clone()),
            )
            .execute(ui),
            Some(Commands::Resume) => {
                super::run::RunCommand::new(ctx, super::run::RunMode::Resume).execute(ui)
            }
            Some(Commands::Abandon) => super::status::AbandonCommand::new(ctx).execute(ui),
            Some(Commands::Completions(args)) => {
                super::completions::CompletionsCommand::new(args.clone()).execute(ui)
            }
        }
    }
}
