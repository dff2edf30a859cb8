//! services/portal/src/views/chat.rs
//!
//! The compose page: a message to any recipient e-mail. Starting a conversation
//! this way adds the recipient to the inbox contacts.

use alumnos_core::domain::{OutgoingMessage, Session};
use alumnos_core::validation::ValidationError;
use tracing::{error, info};

use crate::views::{banner_text, AppState, SessionContext, ViewError, ViewResult};

pub const SENT: &str = "message sent";

pub struct ComposeView {
    state: AppState,
    session: Session,
    pub recipient_email: String,
    pub content: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl ComposeView {
    pub fn mount(state: AppState, ctx: &SessionContext) -> ViewResult<Self> {
        Ok(Self {
            state,
            session: ctx.require()?,
            recipient_email: String::new(),
            content: String::new(),
            notice: None,
            error: None,
        })
    }

    pub async fn send(&mut self) -> ViewResult<()> {
        self.error = None;
        self.notice = None;
        if self.content.trim().is_empty() || self.recipient_email.trim().is_empty() {
            let e = ValidationError::EmptyMessage;
            self.error = Some(e.to_string());
            return Err(e.into());
        }
        // The server fills in the sender from the token.
        let outgoing = OutgoingMessage {
            sender_email: None,
            recipient_email: self.recipient_email.trim().to_string(),
            content: self.content.clone(),
        };
        match self
            .state
            .messages
            .send_message(&self.session.token, &outgoing)
            .await
        {
            Ok(()) => {
                info!(to = %outgoing.recipient_email, "Message sent");
                self.content.clear();
                self.recipient_email.clear();
                self.notice = Some(SENT.to_string());
                Ok(())
            }
            Err(e) => {
                error!(to = %outgoing.recipient_email, "Failed to send message: {}", e);
                self.error = Some(banner_text(&e, "could not send the message"));
                Err(ViewError::Failed(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fakes::{self, FakeApi};
    use alumnos_core::domain::Role;
    use std::sync::Arc;

    fn ctx() -> SessionContext {
        fakes::signed_in(fakes::session("me@x.com", Role::Student))
    }

    #[tokio::test]
    async fn both_fields_are_required() {
        let api = Arc::new(FakeApi::default());
        let mut view = ComposeView::mount(fakes::app(&api), &ctx()).unwrap();
        view.recipient_email = "ana@x.com".into();

        assert!(view.send().await.is_err());
        assert_eq!(
            view.error.as_deref(),
            Some("the message and the recipient cannot be empty")
        );
        assert!(api.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_without_sender_and_clears_the_form() {
        let api = Arc::new(FakeApi::default());
        let mut view = ComposeView::mount(fakes::app(&api), &ctx()).unwrap();
        view.recipient_email = "ana@x.com".into();
        view.content = "hola".into();

        view.send().await.unwrap();
        assert_eq!(view.notice.as_deref(), Some(SENT));
        assert!(view.content.is_empty() && view.recipient_email.is_empty());
        assert_eq!(api.sent.lock().unwrap()[0].sender_email, None);
    }

    #[tokio::test]
    async fn server_message_is_shown() {
        let api = Arc::new(FakeApi::default());
        api.fail(true);
        let mut view = ComposeView::mount(fakes::app(&api), &ctx()).unwrap();
        view.recipient_email = "ana@x.com".into();
        view.content = "hola".into();

        assert!(view.send().await.is_err());
        assert_eq!(view.error.as_deref(), Some("server says no"));
        assert_eq!(view.content, "hola");
    }
}
