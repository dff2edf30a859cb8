//! services/portal/src/views/guard.rs
//!
//! The session context injected into every view, and the guard authenticated
//! views run when they mount.

use std::sync::Arc;

use alumnos_core::domain::Session;
use alumnos_core::ports::SessionStore;
use tracing::{error, info};

use crate::views::{Route, ViewError, ViewResult};

/// Explicit access to the stored session. The token is opaque and only checked for presence.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The stored session, if any. Storage failures count as no session.
    pub fn current(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session.filter(|s| !s.token.is_empty()),
            Err(e) => {
                error!("Failed to read the stored session: {}", e);
                None
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    /// Guard for authenticated views: missing token means redirect to login.
    pub fn require(&self) -> ViewResult<Session> {
        self.current().ok_or(ViewError::Redirect(Route::Login))
    }

    /// Like [`require`](Self::require) for views that also need the profile e-mail.
    pub fn require_profile(&self) -> ViewResult<Session> {
        self.require()?;
        self.current()
            .filter(|s| !s.user.email.is_empty())
            .ok_or(ViewError::Redirect(Route::Login))
    }

    pub fn establish(&self, session: &Session) -> ViewResult<()> {
        self.store.save(session)?;
        info!(email = %session.user.email, "Session established");
        Ok(())
    }

    /// Drops the session. Storage failures are logged; the caller navigates away regardless.
    pub fn invalidate(&self) {
        if let Err(e) = self.store.clear() {
            error!("Failed to clear the stored session: {}", e);
        } else {
            info!("Session cleared");
        }
    }
}
