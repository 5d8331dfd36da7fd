//! Configuration schema definitions.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::runner::DependencyScope;

/// Root configuration structure for `dotstep.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DotstepConfig {
    /// Global settings
    pub settings: Settings,

    /// Step categories, in display and registration order
    pub categories: Vec<CategoryConfig>,
}

impl DotstepConfig {
    /// Every configured step with its category name, in file order.
    pub fn steps(&self) -> impl Iterator<Item = (&str, &StepConfig)> {
        self.categories
            .iter()
            .flat_map(|c| c.steps.iter().map(move |s| (c.name.as_str(), s)))
    }

    /// Number of configured steps across all categories.
    pub fn step_count(&self) -> usize {
        self.categories.iter().map(|c| c.steps.len()).sum()
    }
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Report what would run without running anything
    #[serde(skip_serializing_if = "is_false")]
    pub dry_run: bool,

    /// Log level when neither `--debug` nor `RUST_LOG` is given
    pub log_level: LogLevel,

    /// Colored terminal output
    pub use_color: bool,

    /// Keep going after a failure when no one can be asked
    #[serde(skip_serializing_if = "is_false")]
    pub continue_on_error: bool,

    /// Session file location (`~` is expanded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,

    /// Which prerequisites run before a named step
    pub dependency_scope: DependencyScope,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dry_run: false,
            log_level: LogLevel::default(),
            use_color: true,
            continue_on_error: false,
            session_file: None,
            dependency_scope: DependencyScope::default(),
        }
    }
}

fn is_false(v: &bool) -> bool {
    !v
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Name understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

/// A named group of steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name shown in listings
    pub name: String,

    /// Steps in this category
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// A single shell-command step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepConfig {
    /// Unique step name
    pub name: String,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Shell command to run
    #[serde(default)]
    pub command: String,

    /// Steps that must run first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Failure does not stop a full run
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Skip the step when this command exits 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_if: Option<String>,

    /// Text stdout must contain for the step to succeed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,

    /// Command timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}
