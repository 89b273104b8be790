use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AskfolioError, Result};
use crate::model::Session;

/// Short-lived storage for the single active session.
///
/// An unreadable or corrupt stored value reads as "no session".
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-process slot holding the session as a JSON string, the way a browser
/// tab keeps it in session storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value without validation.
    pub fn set_raw(&self, raw: impl Into<String>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(raw.into());
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Option<Session> {
        let slot = self.slot.lock().ok()?;
        let raw = slot.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "stored session is corrupt, ignoring");
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| AskfolioError::Storage(format!("session slot poisoned: {e}")))?;
        *slot = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| AskfolioError::Storage(format!("session slot poisoned: {e}")))?;
        *slot = None;
        Ok(())
    }
}

/// Session kept in a JSON file so it survives between CLI invocations.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/askfolio/session.json`
    pub fn default_path() -> Option<PathBuf> {
        crate::config::config_dir().map(|d| d.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Option<Session> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read session file");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file is corrupt, ignoring");
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, json).map_err(|e| {
            AskfolioError::Storage(format!(
                "failed to write session file {}: {e}",
                self.path.display()
            ))
        })
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
