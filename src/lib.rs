//! Dotstep - resumable, dependency-ordered dotfile setup.
//!
//! Steps are declared in `dotstep.yml`, grouped by category, and run in an
//! order that respects their `depends_on` edges. Progress is checkpointed to
//! a session file after every successful step so an interrupted or failed
//! run can be resumed.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`runner`] - Dependency resolution, execution and session-aware runs
//! - [`session`] - Persisted run progress
//! - [`shell`] - Shell command execution
//! - [`steps`] - Steps, their actions and results
//! - [`ui`] - Terminal output, prompts and progress
//!
//! # Example
//!
//! ```
//! use dotstep::runner::Executor;
//! use dotstep::steps::{Step, StepResult};
//! use dotstep::ui::MockUI;
//! use std::time::Duration;
//!
//! let mut executor = Executor::new(false);
//! executor
//!     .add_step(
//!         Step::builder("git")
//!             .action_fn(|name| Ok(StepResult::success(name, "ok", Duration::ZERO)))
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let mut ui = MockUI::new();
//! let summary = executor.execute_all(&mut ui).unwrap();
//! assert_eq!(summary.successful, 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod session;
pub mod shell;
pub mod steps;
pub mod ui;

pub use error::{DotstepError, Result};
