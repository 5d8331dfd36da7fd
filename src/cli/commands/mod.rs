//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and is routed by
//! [`CommandDispatcher`]. Run commands (`all`, `steps`, `resume`) share
//! [`run::RunCommand`]; session inspection lives in [`status`].

pub mod completions;
pub mod dispatcher;
pub mod list;
pub mod run;
pub mod status;

pub use completions::CompletionsCommand;
pub use dispatcher::{AppContext, Command, CommandDispatcher, CommandResult, CONFIG_EXIT_CODE};
pub use list::ListCommand;
pub use run::{RunCommand, RunMode};
pub use status::{AbandonCommand, StatusCommand};
