//! services/portal/src/adapters/notifications.rs

use alumnos_core::domain::Notification;
use alumnos_core::ports::{NotificationService, PortResult};
use async_trait::async_trait;

use crate::adapters::HttpApi;

#[async_trait]
impl NotificationService for HttpApi {
    async fn list_notifications(&self, token: &str) -> PortResult<Vec<Notification>> {
        self.send_json(self.get(token, "/api/notifications/user"))
            .await
    }
}
