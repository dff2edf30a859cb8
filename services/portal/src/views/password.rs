//! services/portal/src/views/password.rs
//!
//! Three-step password recovery: mail a code, verify it with a new password, done.

use alumnos_core::domain::PasswordReset;
use alumnos_core::validation;
use tracing::{info, warn};

use crate::views::{banner_text, AppState, ViewError, ViewResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStep {
    SendCode,
    VerifyCode,
    Done,
}

impl RecoveryStep {
    pub fn title(self) -> &'static str {
        match self {
            Self::SendCode => "Recover password",
            Self::VerifyCode => "Verify code",
            Self::Done => "Password updated",
        }
    }
}

pub struct PasswordRecoveryView {
    state: AppState,
    pub step: RecoveryStep,
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl PasswordRecoveryView {
    pub fn mount(state: AppState) -> Self {
        Self {
            state,
            step: RecoveryStep::SendCode,
            email: String::new(),
            code: String::new(),
            new_password: String::new(),
            notice: None,
            error: None,
        }
    }

    pub async fn send_code(&mut self) -> ViewResult<()> {
        self.error = None;
        if let Err(e) = validation::require("email", &self.email) {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        match self.state.auth.send_reset_code(self.email.trim()).await {
            Ok(notice) => {
                info!(email = %self.email, "Recovery code requested");
                self.notice = Some(notice.message.unwrap_or_else(|| "code sent".to_string()));
                self.step = RecoveryStep::VerifyCode;
                Ok(())
            }
            Err(e) => {
                warn!("Sending the recovery code failed: {}", e);
                self.error = Some(banner_text(&e, "could not send the code"));
                Err(ViewError::Failed(e))
            }
        }
    }

    pub async fn reset_password(&mut self) -> ViewResult<()> {
        self.error = None;
        let checked = validation::require("code", &self.code)
            .and_then(|_| validation::require("new password", &self.new_password));
        if let Err(e) = checked {
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        let reset = PasswordReset {
            code: self.code.trim().to_string(),
            new_password: self.new_password.clone(),
        };
        match self.state.auth.reset_password(&reset).await {
            Ok(notice) => {
                info!("Password reset");
                self.notice = Some(
                    notice
                        .message
                        .unwrap_or_else(|| "password updated".to_string()),
                );
                self.new_password.clear();
                self.step = RecoveryStep::Done;
                Ok(())
            }
            Err(e) => {
                warn!("Password reset failed: {}", e);
                self.error = Some(banner_text(&e, "could not reset the password"));
                Err(ViewError::Failed(e))
            }
        }
    }
}
