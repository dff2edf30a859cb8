//! services/portal/src/adapters/tasks.rs
//!
//! Implements the `TaskService` port, including the multipart upload of a
//! submission and the blob download of a submitted file.

use alumnos_core::domain::{CreatedTasks, DownloadedFile, GradeRequest, NewTask, Task, UploadFile};
use alumnos_core::ports::{PortError, PortResult, TaskService};
use async_trait::async_trait;
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};

use crate::adapters::http::filename_from_disposition;
use crate::adapters::HttpApi;

#[async_trait]
impl TaskService for HttpApi {
    async fn list_tasks(&self, token: &str, class_id: &str) -> PortResult<Vec<Task>> {
        self.send_json(self.get(token, &format!("/api/tasks/{}", class_id)))
            .await
    }

    async fn create_task(&self, token: &str, task: &NewTask) -> PortResult<Option<Vec<Task>>> {
        let created: CreatedTasks = self
            .send_json(self.post(token, "/api/tasks").json(task))
            .await?;
        Ok(created.tasks)
    }

    async fn get_task(&self, token: &str, task_id: &str) -> PortResult<Task> {
        self.send_json(self.get(token, &format!("/api/tasks/task/{}", task_id)))
            .await
    }

    async fn submit_task(&self, token: &str, task_id: &str, file: &UploadFile) -> PortResult<()> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| PortError::Unexpected(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new()
            .part("file", part)
            .text("taskId", task_id.to_string());

        self.send(self.post(token, "/api/tasks/submit").multipart(form))
            .await?;
        Ok(())
    }

    async fn download_submission(&self, token: &str, task_id: &str) -> PortResult<DownloadedFile> {
        let response = self
            .send(self.get(token, &format!("/api/tasks/submission/{}", task_id)))
            .await?;

        let file_name = filename_from_disposition(
            response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to read file bytes: {}", e)))?;

        Ok(DownloadedFile { file_name, bytes })
    }

    async fn grade_task(&self, token: &str, grade: &GradeRequest) -> PortResult<()> {
        self.send(self.patch(token, "/api/tasks/grade").json(grade))
            .await?;
        Ok(())
    }
}
