//! services/portal/src/adapters/classes.rs

use alumnos_core::domain::{Class, NewClass};
use alumnos_core::ports::{ClassService, PortResult};
use async_trait::async_trait;

use crate::adapters::HttpApi;

#[async_trait]
impl ClassService for HttpApi {
    async fn list_classes(&self, token: &str) -> PortResult<Vec<Class>> {
        self.send_json(self.get(token, "/api/classes")).await
    }

    async fn get_class(&self, token: &str, class_id: &str) -> PortResult<Class> {
        self.send_json(self.get(token, &format!("/api/classes/{}", class_id)))
            .await
    }

    async fn create_class(&self, token: &str, class: &NewClass) -> PortResult<()> {
        self.send(self.post(token, "/api/classes").json(class)).await?;
        Ok(())
    }
}
