//! services/portal/src/adapters/messages.rs

use alumnos_core::domain::{Message, OutgoingMessage};
use alumnos_core::ports::{MessageService, PortResult};
use async_trait::async_trait;
use serde_json::json;

use crate::adapters::HttpApi;

#[async_trait]
impl MessageService for HttpApi {
    async fn list_messages(&self, token: &str) -> PortResult<Vec<Message>> {
        self.send_json(self.get(token, "/api/messages/user")).await
    }

    async fn send_message(&self, token: &str, message: &OutgoingMessage) -> PortResult<()> {
        self.send(self.post(token, "/api/messages/send").json(message))
            .await?;
        Ok(())
    }

    async fn mark_read(&self, token: &str, message_id: &str) -> PortResult<()> {
        let path = format!("/api/messages/{}/read", message_id);
        self.send(self.put(token, &path).json(&json!({}))).await?;
        Ok(())
    }
}
