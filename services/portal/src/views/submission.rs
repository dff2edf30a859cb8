//! services/portal/src/views/submission.rs
//!
//! Task detail page: shows one task and lets its student upload a file.

use alumnos_core::domain::{Session, Task, UploadFile};
use alumnos_core::validation::{self, ValidationError};
use tracing::{error, info};

use crate::views::{banner_text, AppState, SessionContext, ViewError, ViewResult};

pub const SUBMITTED: &str = "task submitted";

pub struct SubmissionView {
    state: AppState,
    session: Session,
    pub task_id: String,
    pub task: Option<Task>,
    /// The picked file, already checked against the upload rules.
    pub file: Option<UploadFile>,
    /// Picked file name, or the submitted file's name once one exists.
    pub file_name: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
    /// Set once an upload is accepted, whatever the follow-up fetch returns.
    submitted: bool,
}

impl SubmissionView {
    pub async fn mount(state: AppState, ctx: &SessionContext, task_id: &str) -> ViewResult<Self> {
        let session = ctx.require()?;
        let mut view = Self {
            state,
            session,
            task_id: task_id.to_string(),
            task: None,
            file: None,
            file_name: None,
            notice: None,
            error: None,
            submitted: false,
        };
        // A failed fetch leaves the banner set; the page still renders.
        let _ = view.refresh().await;
        Ok(view)
    }

    pub async fn refresh(&mut self) -> ViewResult<()> {
        match self.state.tasks.get_task(&self.session.token, &self.task_id).await {
            Ok(task) => {
                if let Some(name) = task.submitted_file_name() {
                    self.file_name = Some(name.to_string());
                }
                self.task = Some(task);
                Ok(())
            }
            Err(e) => {
                error!(task_id = %self.task_id, "Failed to load task: {}", e);
                self.error = Some(banner_text(&e, "could not load the task"));
                Err(ViewError::Failed(e))
            }
        }
    }

    pub fn upload_enabled(&self) -> bool {
        !self.submitted && self.task.as_ref().is_some_and(Task::upload_enabled)
    }

    /// Picks a file. Ignored once a submission exists; rejected files are not kept.
    pub fn choose_file(&mut self, file: UploadFile) -> ViewResult<()> {
        if !self.upload_enabled() {
            return Ok(());
        }
        if let Err(e) = validation::validate_upload(&file) {
            self.error = Some(e.to_string());
            self.file = None;
            return Err(e.into());
        }
        self.error = None;
        self.file_name = Some(file.file_name.clone());
        self.file = Some(file);
        Ok(())
    }

    pub async fn submit(&mut self) -> ViewResult<()> {
        self.error = None;
        self.notice = None;
        let file = match (&self.file, self.upload_enabled()) {
            (_, false) => Err(ValidationError::AlreadySubmitted),
            (None, true) => Err(ValidationError::NoFile),
            (Some(file), true) => Ok(file.clone()),
        };
        let file = match file {
            Ok(file) => file,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        if let Err(e) = self
            .state
            .tasks
            .submit_task(&self.session.token, &self.task_id, &file)
            .await
        {
            error!(task_id = %self.task_id, "Upload failed: {}", e);
            self.error = Some(banner_text(&e, "could not upload the file"));
            return Err(ViewError::Failed(e));
        }
        info!(task_id = %self.task_id, bytes = file.size(), "Submission uploaded");
        self.submitted = true;
        self.notice = Some(SUBMITTED.to_string());
        self.file = None;
        if self.refresh().await.is_err() {
            // The upload stands; the stale task stays on screen until the next visit.
            self.error = None;
        }
        Ok(())
    }

    /// Badge text: the status label in capitals.
    pub fn status_label(&self) -> Option<String> {
        self.task.as_ref().map(crate::views::task_board::status_badge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fakes::{self, FakeApi};
    use alumnos_core::domain::{Role, SubmissionInfo, TaskStatus};
    use alumnos_core::validation::MAX_UPLOAD_BYTES;
    use std::sync::Arc;

    fn pdf(size: usize) -> UploadFile {
        UploadFile {
            file_name: "essay.pdf".into(),
            mime_type: "application/pdf".into(),
            bytes: vec![1; size],
        }
    }

    async fn mounted(api: &Arc<FakeApi>) -> SubmissionView {
        let ctx = fakes::signed_in(fakes::session("a@x.com", Role::Student));
        SubmissionView::mount(fakes::app(api), &ctx, "t1").await.unwrap()
    }

    #[tokio::test]
    async fn oversized_file_never_uploads() {
        let api = Arc::new(FakeApi::default());
        *api.tasks.lock().unwrap() = vec![fakes::task("t1", "a@x.com")];
        let mut view = mounted(&api).await;

        assert!(matches!(
            view.choose_file(pdf(MAX_UPLOAD_BYTES + 1)),
            Err(ViewError::Invalid(ValidationError::FileTooLarge))
        ));
        assert!(matches!(
            view.submit().await,
            Err(ViewError::Invalid(ValidationError::NoFile))
        ));
        assert!(api.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_moves_task_to_submitted() {
        let api = Arc::new(FakeApi::default());
        *api.tasks.lock().unwrap() = vec![fakes::task("t1", "a@x.com")];
        let mut view = mounted(&api).await;
        assert!(view.upload_enabled());

        view.choose_file(pdf(1024)).unwrap();
        view.submit().await.unwrap();

        assert_eq!(view.notice.as_deref(), Some(SUBMITTED));
        assert_eq!(view.task.as_ref().unwrap().status, TaskStatus::Submitted);
        assert_eq!(view.status_label().as_deref(), Some("ENTREGADO"));
        assert_eq!(view.file_name.as_deref(), Some("essay.pdf"));
        assert!(!view.upload_enabled());
        assert_eq!(api.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn accepted_upload_blocks_resubmission_when_reload_fails() {
        let api = Arc::new(FakeApi::default());
        *api.tasks.lock().unwrap() = vec![fakes::task("t1", "a@x.com")];
        let mut view = mounted(&api).await;
        // The server accepts the file but the task can no longer be fetched.
        api.tasks.lock().unwrap().clear();

        view.choose_file(pdf(1024)).unwrap();
        view.submit().await.unwrap();

        assert_eq!(view.notice.as_deref(), Some(SUBMITTED));
        assert_eq!(view.error, None);
        assert!(!view.upload_enabled());

        view.choose_file(pdf(1024)).unwrap();
        assert!(view.file.is_none());
        assert!(matches!(
            view.submit().await,
            Err(ViewError::Invalid(ValidationError::AlreadySubmitted))
        ));
        assert_eq!(api.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn existing_submission_disables_upload() {
        let api = Arc::new(FakeApi::default());
        let mut task = fakes::task("t1", "a@x.com");
        task.status = TaskStatus::Pending;
        task.submission = Some(SubmissionInfo {
            file_url: Some("https://files.example/u/report.docx".into()),
            submitted_at: None,
        });
        *api.tasks.lock().unwrap() = vec![task];
        let mut view = mounted(&api).await;

        assert!(!view.upload_enabled());
        assert_eq!(view.file_name.as_deref(), Some("report.docx"));
        view.choose_file(pdf(10)).unwrap();
        assert!(view.file.is_none());
        assert!(matches!(
            view.submit().await,
            Err(ViewError::Invalid(ValidationError::AlreadySubmitted))
        ));
    }

    #[tokio::test]
    async fn missing_task_sets_banner() {
        let api = Arc::new(FakeApi::default());
        let view = mounted(&api).await;
        assert!(view.task.is_none());
        assert!(view.error.is_some());
    }
}
