//! Resumable run sessions.
//!
//! A session records which steps a run selected and which of them have
//! completed. It is persisted after every step so an interrupted run can be
//! continued with `dotstep resume`.

pub mod store;

pub use store::{SessionStore, SESSION_FILE_NAME};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted checkpoint of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// When the run began.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Steps chosen for the run, in selection order.
    #[serde(default)]
    pub selected_steps: Vec<String>,
    /// Steps still to run. Authoritative for resume.
    #[serde(default)]
    pub pending_steps: Vec<String>,
    /// Steps that finished, in completion order.
    #[serde(default)]
    pub completed_steps: Vec<String>,
    /// Reserved; never populated.
    #[serde(default)]
    pub failed_steps: Vec<String>,
}

impl Session {
    /// A fresh session with every selected step pending.
    pub fn new(selected: Vec<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            pending_steps: selected.clone(),
            selected_steps: selected,
            completed_steps: Vec::new(),
            failed_steps: Vec::new(),
        }
    }

    /// A session with nothing selected.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// True when the session tracks no steps at all.
    pub fn is_empty(&self) -> bool {
        self.selected_steps.is_empty()
            && self.pending_steps.is_empty()
            && self.completed_steps.is_empty()
    }

    /// True when there is nothing left to resume.
    pub fn is_finished(&self) -> bool {
        self.pending_steps.is_empty()
    }

    /// Move a step from pending to completed.
    pub fn mark_completed(&mut self, step_name: &str) {
        self.pending_steps.retain(|s| s != step_name);
        if !self.completed_steps.iter().any(|s| s == step_name) {
            self.completed_steps.push(step_name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_everything_pending() {
        let session = Session::new(vec!["a".into(), "b".into()]);
        assert_eq!(session.pending_steps, session.selected_steps);
        assert!(session.completed_steps.is_empty());
        assert!(!session.is_finished());
    }

    #[test]
    fn mark_completed_moves_step_once() {
        let mut session = Session::new(vec!["a".into(), "b".into()]);
        session.mark_completed("a");
        session.mark_completed("a");

        assert_eq!(session.pending_steps, vec!["b"]);
        assert_eq!(session.completed_steps, vec!["a"]);
    }

    #[test]
    fn mark_completed_unknown_step_is_recorded() {
        let mut session = Session::new(vec!["a".into()]);
        session.mark_completed("dep");
        assert_eq!(session.pending_steps, vec!["a"]);
        assert_eq!(session.completed_steps, vec!["dep"]);
    }

    #[test]
    fn empty_session_is_finished() {
        let session = Session::empty();
        assert!(session.is_empty());
        assert!(session.is_finished());
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let session: Session =
            serde_json::from_str(r#"{"selected_steps":["a"],"pending_steps":["a"]}"#).unwrap();
        assert_eq!(session.pending_steps, vec!["a"]);
        assert!(session.failed_steps.is_empty());
    }

    #[test]
    fn timestamp_serializes_as_iso8601() {
        let session = Session::empty();
        let json = serde_json::to_value(&session).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
