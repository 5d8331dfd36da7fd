//! Session storage.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::Session;

/// File name of the session record in the home directory.
pub const SESSION_FILE_NAME: &str = ".dotstep_session.json";

/// Persists the single in-flight session as one JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.dotstep_session.json`, or the working directory when no home
    /// directory can be determined.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SESSION_FILE_NAME)
    }

    /// Store at [`SessionStore::default_path`].
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a session record exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Start a new session for `selected`, replacing any prior one.
    pub fn save<S: AsRef<str>>(&self, selected: &[S]) -> Result<Session> {
        let session = Session::new(selected.iter().map(|s| s.as_ref().to_string()).collect());
        self.write(&session)?;
        debug!(
            "Saved session with {} selected step(s) to {}",
            session.selected_steps.len(),
            self.path.display()
        );
        Ok(session)
    }

    /// Move `step_name` from pending to completed and persist immediately.
    ///
    /// Does nothing when there is no session on disk.
    pub fn update_progress(&self, step_name: &str) -> Result<Option<Session>> {
        let Some(mut session) = self.load()? else {
            debug!("No session to update for '{}'", step_name);
            return Ok(None);
        };

        session.mark_completed(step_name);
        self.write(&session)?;
        Ok(Some(session))
    }

    /// Read the session.
    ///
    /// Returns `None` when no session exists. Unparseable content is
    /// reported as a warning and yields an empty session.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {:?}", self.path))?;

        match serde_json::from_str::<Session>(&json) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(
                    "Ignoring corrupt session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Some(Session::empty()))
            }
        }
    }

    /// Delete the session record. Missing files are not an error.
    pub fn cleanup(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove session {:?}", self.path))
            }
        }
    }

    /// Write via a temp file and rename so a crash never leaves a partial
    /// record behind.
    fn write(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create session directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(session)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write session to {:?}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to move session into {:?}", self.path))
    }
}
