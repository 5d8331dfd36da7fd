//! Error types for dotstep operations.
//!
//! This module defines [`DotstepError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Resolution-level failures (a dependency cycle) and setup failures
//!   (duplicate steps, bad configuration) are returned as `DotstepError`
//! - Anything a step action raises is converted into a failing
//!   [`StepResult`](crate::steps::StepResult) at the step boundary
//! - Use `anyhow::Error` (via `DotstepError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dotstep operations.
#[derive(Debug, Error)]
pub enum DotstepError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Step dependency cycle detected.
    #[error("Circular dependency detected involving step: {step} ({cycle})")]
    CircularDependency { step: String, cycle: String },

    /// Two registered steps share a name.
    #[error("Duplicate step name: {name}")]
    DuplicateStep { name: String },

    /// Shell command could not be run.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for dotstep operations.
pub type Result<T> = std::result::Result<T, DotstepError>;
