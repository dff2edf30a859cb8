//! services/portal/src/views/login.rs
//!
//! Login and logout.

use alumnos_core::domain::Credentials;
use alumnos_core::validation::{self, ValidationError};
use tracing::{info, warn};

use crate::views::{AppState, Route, SessionContext, ViewError, ViewResult};

pub const LOGIN_FAILED: &str = "incorrect credentials";

pub struct LoginView {
    state: AppState,
    session: SessionContext,
    pub email: String,
    pub password: String,
    /// Set on mount when someone is already signed in on this device.
    pub already_signed_in: bool,
    pub error: Option<String>,
}

impl LoginView {
    pub fn mount(state: AppState, session: SessionContext) -> Self {
        let already_signed_in = session.is_active();
        Self {
            state,
            session,
            email: String::new(),
            password: String::new(),
            already_signed_in,
            error: None,
        }
    }

    /// Exchanges the credentials for a session and persists it.
    pub async fn submit(&mut self) -> ViewResult<Route> {
        self.error = None;
        match self.try_submit().await {
            Ok(route) => Ok(route),
            Err(e) => {
                self.error = Some(match &e {
                    ViewError::Failed(_) => LOGIN_FAILED.to_string(),
                    other => other.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn try_submit(&mut self) -> ViewResult<Route> {
        if self.session.is_active() {
            return Err(ValidationError::SessionActive.into());
        }
        validation::require("email", &self.email)?;
        validation::require("password", &self.password)?;

        let credentials = Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let session = self.state.auth.login(&credentials).await.map_err(|e| {
            warn!(email = %credentials.email, "Login failed: {}", e);
            e
        })?;
        self.session.establish(&session)?;
        info!(email = %session.user.email, "Logged in");
        self.password.clear();
        Ok(Route::Dashboard)
    }

    /// Signs out and sends the user home.
    pub fn logout(&mut self) -> Route {
        self.session.invalidate();
        self.already_signed_in = false;
        Route::Home
    }
}
