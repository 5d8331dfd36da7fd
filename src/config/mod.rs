//! Configuration loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery, loading and step construction in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use dotstep::config::{build_steps, load_config};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(
//!     temp.path().join("dotstep.yml"),
//!     "categories:\n  - name: Shell\n    steps:\n      - name: zsh\n        command: echo zsh\n",
//! )
//! .unwrap();
//!
//! let (_, config) = load_config(None, temp.path()).unwrap();
//! let steps = build_steps(&config).unwrap();
//! assert_eq!(steps[0].name(), "zsh");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    build_steps, discover_config, expand_tilde, load_config, load_config_file, parse_config,
    session_path, PROJECT_CONFIG_FILE,
};
pub use schema::{CategoryConfig, DotstepConfig, LogLevel, Settings, StepConfig};
pub use validator::{validate, validate_config, ValidationError};
