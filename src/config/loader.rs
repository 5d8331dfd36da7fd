//! Configuration file discovery and loading.
//!
//! Lookup order, first match wins:
//! 1. `--config` (or `DOTSTEP_CONFIG`)
//! 2. `./dotstep.yml`
//! 3. `<config dir>/dotstep/config.yml`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::config::schema::{DotstepConfig, Settings};
use crate::config::validator::validate;
use crate::error::{DotstepError, Result};
use crate::session::SessionStore;
use crate::steps::{CommandAction, Step};

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "dotstep.yml";

/// Find the config file to use.
///
/// An explicit path must exist. Otherwise the project file in `cwd` wins
/// over the user config directory.
pub fn discover_config(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    discover_config_in(explicit, cwd, dirs::config_dir().as_deref())
}

fn discover_config_in(
    explicit: Option<&Path>,
    cwd: &Path,
    config_dir: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(DotstepError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let project = cwd.join(PROJECT_CONFIG_FILE);
    if project.is_file() {
        return Ok(project);
    }

    if let Some(dir) = config_dir {
        let user = dir.join("dotstep").join("config.yml");
        if user.is_file() {
            return Ok(user);
        }
    }

    Err(DotstepError::ConfigNotFound { path: project })
}

/// Load a single config file and parse it.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<DotstepConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DotstepError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DotstepError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content.
pub fn parse_config(content: &str, source_path: &Path) -> Result<DotstepConfig> {
    serde_yaml::from_str(content).map_err(|e| DotstepError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Discover, load and validate the configuration.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<(PathBuf, DotstepConfig)> {
    let path = discover_config(explicit, cwd)?;
    debug!("Loading config from {}", path.display());
    let config = load_config_file(&path)?;
    validate(&config)?;
    Ok((path, config))
}

/// Turn every configured step into a [`Step`], in file order.
pub fn build_steps(config: &DotstepConfig) -> Result<Vec<Step>> {
    config
        .steps()
        .map(|(category, step)| {
            let mut action = CommandAction::new(step.command.clone());
            if let Some(expected) = &step.expected_output {
                action = action.expected_output(expected.clone());
            }
            if let Some(check) = &step.skip_if {
                action = action.skip_if(check.clone());
            }
            if let Some(secs) = step.timeout {
                action = action.timeout(Duration::from_secs(secs));
            }

            let mut builder = Step::builder(step.name.clone())
                .category(category)
                .dependencies(step.depends_on.iter().cloned())
                .optional(step.optional)
                .action(action);
            if let Some(description) = &step.description {
                builder = builder.description(description.clone());
            }
            builder.build()
        })
        .collect()
}

/// Session file for these settings.
pub fn session_path(settings: &Settings) -> PathBuf {
    match &settings.session_file {
        Some(path) => expand_tilde(path),
        None => SessionStore::default_path(),
    }
}

/// Expand a leading `~` against the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
