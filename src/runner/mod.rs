//! Step execution orchestration.
//!
//! - [`DependencyResolver`] orders steps so prerequisites run first
//! - [`Executor`] owns the steps and runs them
//! - [`SessionRunner`] wraps an executor with session checkpoints

pub mod batch;
pub mod dependency;
pub mod executor;
pub mod interrupt;

pub use batch::{RunOptions, RunOutcome, RunReport, SessionRunner};
pub use dependency::{DependencyResolver, MissingDependency, Resolution};
pub use executor::{DependencyScope, ExecutionSummary, Executor, FailureDetail};
pub use interrupt::{install_handler, InterruptFlag, INTERRUPTED_EXIT_CODE};
