//! services/portal/src/adapters/session_store.rs
//!
//! Implementations of the `SessionStore` port: a JSON file on disk for the
//! binary, and an in-memory store for embedding and tests.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use alumnos_core::domain::Session;
use alumnos_core::ports::{PortError, PortResult, SessionStore};
use tracing::debug;

//=========================================================================================
// File-backed Store
//=========================================================================================

/// Keeps the session in a JSON file until it is explicitly cleared.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(e: std::io::Error) -> PortError {
    PortError::Unexpected(format!("Session storage failed: {}", e))
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> PortResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path).map_err(io_error)?;
        // A damaged file counts as no session; the user simply logs in again.
        Ok(serde_json::from_str(&raw).ok())
    }

    fn save(&self, session: &Session) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(io_error)?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}

//=========================================================================================
// In-memory Store
//=========================================================================================

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> PortResult<std::sync::MutexGuard<'_, Option<Session>>> {
        self.session
            .lock()
            .map_err(|_| PortError::Unexpected("session lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> PortResult<Option<Session>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, session: &Session) -> PortResult<()> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}
