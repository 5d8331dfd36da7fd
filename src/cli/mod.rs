//! Command-line interface for dotstep.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, StepsArgs};
pub use commands::{AppContext, Command, CommandDispatcher, CommandResult};
