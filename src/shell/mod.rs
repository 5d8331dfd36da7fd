//! Shell command execution.
//!
//! - [`execute`] runs a command through the platform shell with a timeout
//! - [`execute_check`] runs a check command and reports only success
//! - [`is_ci`] detects CI environments

pub mod command;
pub mod platform;

pub use command::{execute, execute_check, CommandOptions, CommandResult};
pub use platform::is_ci;
