//! services/portal/src/views/task_board.rs
//!
//! The teacher's view of one class: every student's task, task creation,
//! grading and submission downloads.

use std::path::{Path, PathBuf};

use alumnos_core::domain::{GradeRequest, NewTask, Session, Task};
use alumnos_core::ports::PortError;
use alumnos_core::tasks::due_at_end_of_day;
use alumnos_core::validation::{self, ValidationError};
use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use crate::adapters::http::DEFAULT_DOWNLOAD_NAME;
use crate::views::{banner_text, AppState, Route, SessionContext, ViewError, ViewResult};

/// The create-task modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub instructions: String,
    /// `YYYY-MM-DD`, as typed.
    pub due_date: String,
}

impl TaskDraft {
    /// Due at the last millisecond of the chosen day, local time.
    pub fn build(&self, class_id: &str) -> Result<NewTask, ValidationError> {
        if self.instructions.trim().is_empty() || self.due_date.trim().is_empty() {
            return Err(ValidationError::IncompleteForm);
        }
        let day = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate(self.due_date.clone()))?;
        Ok(NewTask {
            class_id: class_id.to_string(),
            instructions: self.instructions.trim().to_string(),
            due_date: due_at_end_of_day(day, &Local),
        })
    }
}

pub struct TaskBoardView {
    state: AppState,
    session: Session,
    pub class_id: String,
    pub class_name: String,
    pub tasks: Vec<Task>,
    pub draft: Option<TaskDraft>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl TaskBoardView {
    /// Loads the class tasks and the class name side by side.
    pub async fn mount(state: AppState, ctx: &SessionContext, class_id: &str) -> ViewResult<Self> {
        let session = ctx.require()?;
        let (tasks, class) = futures::join!(
            state.tasks.list_tasks(&session.token, class_id),
            state.classes.get_class(&session.token, class_id),
        );

        let mut view = Self {
            state,
            session,
            class_id: class_id.to_string(),
            class_name: String::new(),
            tasks: Vec::new(),
            draft: None,
            notice: None,
            error: None,
        };
        match tasks {
            Ok(tasks) => view.tasks = tasks,
            Err(e) => {
                error!(class_id, "Failed to load tasks: {}", e);
                view.error = Some(banner_text(&e, "could not load the tasks"));
            }
        }
        match class {
            Ok(class) => view.class_name = class.name,
            Err(e) => error!(class_id, "Failed to load class details: {}", e),
        }
        Ok(view)
    }

    pub async fn refresh(&mut self) -> ViewResult<()> {
        match self
            .state
            .tasks
            .list_tasks(&self.session.token, &self.class_id)
            .await
        {
            Ok(tasks) => {
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => {
                error!(class_id = %self.class_id, "Failed to refresh tasks: {}", e);
                self.error = Some(banner_text(&e, "could not load the tasks"));
                Err(ViewError::Failed(e))
            }
        }
    }

    pub fn open_modal(&mut self) {
        self.draft = Some(TaskDraft::default());
    }

    pub fn close_modal(&mut self) {
        self.draft = None;
    }

    /// Creates the task for every student and appends what the server returned.
    pub async fn create_task(&mut self) -> ViewResult<()> {
        self.error = None;
        let draft = self.draft.clone().unwrap_or_default();
        let task = match draft.build(&self.class_id) {
            Ok(task) => task,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };

        match self.state.tasks.create_task(&self.session.token, &task).await {
            Ok(Some(created)) => {
                info!(class_id = %self.class_id, count = created.len(), "Tasks created");
                self.tasks.extend(created);
                self.draft = None;
                Ok(())
            }
            Ok(None) => {
                warn!(class_id = %self.class_id, "Task creation answered without tasks");
                self.error = Some("could not create the task".to_string());
                Err(PortError::Unexpected("no tasks in the response".to_string()).into())
            }
            Err(e) => {
                error!(class_id = %self.class_id, "Failed to create task: {}", e);
                self.error = Some(banner_text(&e, "could not create the task"));
                Err(ViewError::Failed(e))
            }
        }
    }

    /// Grades a task and re-fetches the list so the new status shows up.
    pub async fn grade(&mut self, task_id: &str, input: &str) -> ViewResult<()> {
        self.error = None;
        self.notice = None;
        let grade = match validation::parse_grade(input) {
            Ok(grade) => grade,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };
        let request = GradeRequest {
            task_id: task_id.to_string(),
            grade,
        };
        if let Err(e) = self.state.tasks.grade_task(&self.session.token, &request).await {
            error!(task_id, "Failed to grade task: {}", e);
            self.error = Some(banner_text(&e, "could not grade the task"));
            return Err(ViewError::Failed(e));
        }
        info!(task_id, grade, "Task graded");
        self.notice = Some("task graded".to_string());
        self.refresh().await
    }

    /// Saves a student's submitted file under `download_dir` and returns its path.
    pub async fn download(&mut self, task_id: &str) -> ViewResult<PathBuf> {
        self.error = None;
        let file = match self
            .state
            .tasks
            .download_submission(&self.session.token, task_id)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                error!(task_id, "Failed to download submission: {}", e);
                self.error = Some(banner_text(&e, "could not download the file"));
                return Err(ViewError::Failed(e));
            }
        };

        // Only the last path component of the server's name is used.
        let name = Path::new(&file.file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.into());
        let target = self.state.config.download_dir.join(name);
        if let Err(e) = tokio::fs::write(&target, &file.bytes).await {
            error!(path = %target.display(), "Failed to save download: {}", e);
            self.error = Some("could not save the file".to_string());
            return Err(PortError::Unexpected(e.to_string()).into());
        }
        info!(task_id, path = %target.display(), bytes = file.bytes.len(), "Submission saved");
        Ok(target)
    }

    pub fn create_questionnaire(&self) -> Route {
        Route::CreateQuestionnaire
    }
}

/// Badge text: the status label in capitals.
pub fn status_badge(task: &Task) -> String {
    task.status.as_str().to_uppercase()
}
