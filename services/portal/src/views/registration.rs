//! services/portal/src/views/registration.rs
//!
//! Account creation, gated by an arithmetic CAPTCHA.

use alumnos_core::domain::Registration;
use alumnos_core::validation::{self, ValidationError};
use rand::Rng;
use tracing::{info, warn};

use crate::views::{banner_text, AppState, Route, ViewError, ViewResult};

/// Two operands in `1..=10`; the answer must be their exact sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Captcha {
    pub num1: u32,
    pub num2: u32,
}

impl Captcha {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            num1: rng.gen_range(1..=10),
            num2: rng.gen_range(1..=10),
        }
    }

    pub fn question(&self) -> String {
        format!("{} + {} = ?", self.num1, self.num2)
    }

    pub fn check(&self, answer: &str) -> Result<(), ValidationError> {
        validation::check_captcha(self.num1, self.num2, answer)
    }
}

pub struct RegistrationView {
    state: AppState,
    pub form: Registration,
    pub captcha: Captcha,
    pub captcha_answer: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl RegistrationView {
    pub fn mount(state: AppState) -> Self {
        Self {
            state,
            form: Registration::default(),
            captcha: Captcha::generate(&mut rand::thread_rng()),
            captcha_answer: String::new(),
            notice: None,
            error: None,
        }
    }

    pub async fn submit(&mut self) -> ViewResult<Route> {
        self.error = None;
        self.notice = None;

        let checked = validation::require("name", &self.form.name)
            .and_then(|_| validation::require("email", &self.form.email))
            .and_then(|_| validation::require("password", &self.form.password))
            .map_err(|_| ValidationError::IncompleteForm)
            .and_then(|_| self.captcha.check(&self.captcha_answer));
        if let Err(e) = checked {
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        let result = self.state.auth.register(&self.form).await;
        // Every attempt that reached the server gets a fresh challenge.
        self.captcha = Captcha::generate(&mut rand::thread_rng());
        self.captcha_answer.clear();

        match result {
            Ok(notice) => {
                info!(email = %self.form.email, "Account registered");
                self.notice = Some(
                    notice
                        .message
                        .unwrap_or_else(|| "registration complete".to_string()),
                );
                Ok(Route::Login)
            }
            Err(e) => {
                warn!(email = %self.form.email, "Registration failed: {}", e);
                self.error = Some(banner_text(&e, "registration failed"));
                Err(ViewError::Failed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fakes::{self, FakeApi};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn filled(api: &Arc<FakeApi>) -> RegistrationView {
        let mut view = RegistrationView::mount(fakes::app(api));
        view.form = Registration {
            name: "Ana".into(),
            email: "ana@x.com".into(),
            password: "secret".into(),
        };
        view.captcha = Captcha { num1: 3, num2: 4 };
        view
    }

    #[test]
    fn captcha_operands_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = Captcha::generate(&mut rng);
            assert!((1..=10).contains(&c.num1));
            assert!((1..=10).contains(&c.num2));
        }
    }

    #[tokio::test]
    async fn wrong_captcha_never_reaches_the_server() {
        let api = Arc::new(FakeApi::default());
        let mut view = filled(&api);
        view.captcha_answer = "8".into();

        assert!(matches!(
            view.submit().await,
            Err(ViewError::Invalid(ValidationError::CaptchaMismatch))
        ));
        assert_eq!(api.registrations.load(Ordering::SeqCst), 0);
        assert_eq!(view.captcha, Captcha { num1: 3, num2: 4 });
    }

    #[tokio::test]
    async fn missing_field_blocks_submit() {
        let api = Arc::new(FakeApi::default());
        let mut view = filled(&api);
        view.form.password.clear();
        view.captcha_answer = "7".into();

        assert!(view.submit().await.is_err());
        assert_eq!(view.error.as_deref(), Some("all fields are required"));
        assert_eq!(api.registrations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn correct_answer_registers_and_goes_to_login() {
        let api = Arc::new(FakeApi::default());
        let mut view = filled(&api);
        view.captcha_answer = "7".into();

        assert_eq!(view.submit().await.unwrap(), Route::Login);
        assert_eq!(view.notice.as_deref(), Some("user registered"));
        assert_eq!(api.registrations.load(Ordering::SeqCst), 1);
        assert!(view.captcha_answer.is_empty());
    }

    #[tokio::test]
    async fn server_message_is_shown_on_failure() {
        let api = Arc::new(FakeApi::default());
        api.fail(true);
        let mut view = filled(&api);
        view.captcha_answer = "7".into();

        assert!(view.submit().await.is_err());
        assert_eq!(view.error.as_deref(), Some("server says no"));
    }
}
