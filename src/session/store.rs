use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::models::Category;

pub const SESSION_FILE: &str = "current_session.json";

/// The persisted active-session record. This struct is the single source of
/// truth for the record's shape; nothing else writes to the session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: String,
    pub category: Category,
    pub question: String,
    pub question_number: u32,
}

/// Durable client-local store for the one active-session record, so an
/// in-progress interview survives a process restart.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("interviewiq")
            .join(SESSION_FILE)
    }

    /// A missing, unreadable, or unparseable record means "no session", never
    /// an error.
    pub fn load(&self) -> Option<StoredSession> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(record) => {
                debug!("📋 Loaded session record from {}", self.path.display());
                Some(record)
            }
            Err(e) => {
                warn!(
                    "⚠️ Ignoring unreadable session record at {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Overwrites the record. Failures are logged; a transition never fails
    /// because the record could not be written.
    pub fn save(&self, record: &StoredSession) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("⚠️ Could not create {}: {}", parent.display(), e);
                return;
            }
        }
        match serde_json::to_string_pretty(record) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    warn!("⚠️ Could not persist session record: {}", e);
                }
            }
            Err(e) => warn!("⚠️ Could not serialize session record: {}", e),
        }
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("⚠️ Could not remove session record: {}", e);
            }
        }
    }
}
