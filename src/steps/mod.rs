//! Steps and their outcomes.
//!
//! - [`Step`] - A named unit of work with a lifecycle and dependencies
//! - [`StepAction`] - The work a step performs
//! - [`StepResult`] - Immutable record of one execution attempt
//! - [`CommandAction`] - A step body that runs a shell command
//!
//! # Example
//!
//! ```
//! use dotstep::steps::{Step, StepResult, StepStatus};
//! use std::time::Duration;
//!
//! let mut step = Step::builder("show_date")
//!     .description("Print the date")
//!     .action_fn(|name| Ok(StepResult::success(name, "today", Duration::ZERO)))
//!     .build()
//!     .unwrap();
//!
//! let result = step.execute();
//! assert!(result.success);
//! assert_eq!(step.status(), StepStatus::Completed);
//! ```

pub mod command;
pub mod result;
pub mod step;

pub use command::CommandAction;
pub use result::{format_duration, StepContext, StepResult};
pub use step::{FnAction, Step, StepAction, StepBuilder, StepStatus};
