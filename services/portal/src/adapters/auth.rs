//! services/portal/src/adapters/auth.rs
//!
//! Implements the `AuthService` port: login, registration, profile lookup and
//! password recovery.

use alumnos_core::domain::{Credentials, PasswordReset, Registration, ServerNotice, Session, UserProfile};
use alumnos_core::ports::{AuthService, PortResult};
use async_trait::async_trait;
use serde_json::json;

use crate::adapters::HttpApi;

#[async_trait]
impl AuthService for HttpApi {
    async fn login(&self, credentials: &Credentials) -> PortResult<Session> {
        self.send_json(self.anonymous_post("/api/users/login").json(credentials))
            .await
    }

    async fn register(&self, registration: &Registration) -> PortResult<ServerNotice> {
        self.send_notice(self.anonymous_post("/api/users/register").json(registration))
            .await
    }

    async fn current_user(&self, token: &str) -> PortResult<UserProfile> {
        self.send_json(self.get(token, "/api/user")).await
    }

    async fn send_reset_code(&self, email: &str) -> PortResult<ServerNotice> {
        let body = json!({ "email": email });
        self.send_notice(self.anonymous_post("/api/password/send-code").json(&body))
            .await
    }

    async fn reset_password(&self, reset: &PasswordReset) -> PortResult<ServerNotice> {
        self.send_notice(self.anonymous_post("/api/password/reset").json(reset))
            .await
    }
}
