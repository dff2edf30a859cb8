//! services/portal/src/views/task_list.rs
//!
//! The task list of a class as seen by a student (own tasks only) or a teacher (all).

use alumnos_core::domain::{Session, Task};
use alumnos_core::tasks::{can_open, visible_tasks};
use alumnos_core::validation::ValidationError;
use tracing::{error, warn};

use crate::views::{AppState, Route, SessionContext, ViewError, ViewResult};

pub struct TaskListView {
    session: Session,
    pub class_id: String,
    pub tasks: Vec<Task>,
    pub error: Option<String>,
}

impl TaskListView {
    pub async fn mount(state: AppState, ctx: &SessionContext, class_id: &str) -> ViewResult<Self> {
        let session = ctx.require_profile()?;
        let mut view = Self {
            session,
            class_id: class_id.to_string(),
            tasks: Vec::new(),
            error: None,
        };
        if class_id.is_empty() {
            view.error = Some("no class selected".to_string());
            return Ok(view);
        }
        match state.tasks.list_tasks(&view.session.token, class_id).await {
            Ok(all) => view.tasks = visible_tasks(all, &view.session.user),
            Err(e) => {
                error!(class_id, "Failed to load tasks: {}", e);
                view.error = Some(format!("could not load the tasks: {}", e));
            }
        }
        Ok(view)
    }

    pub fn is_teacher(&self) -> bool {
        self.session.user.is_teacher()
    }

    /// Opens the detail page; students are refused tasks that are not theirs.
    pub fn open_task(&mut self, task_id: &str) -> ViewResult<Route> {
        let task = self.tasks.iter().find(|t| t.id == task_id);
        match task {
            Some(task) if can_open(task, &self.session.user) => Ok(Route::TaskDetail {
                task_id: task.id.clone(),
            }),
            _ => {
                warn!(task_id, email = %self.session.user.email, "Refused to open task");
                let e = ValidationError::NotYourTask;
                self.error = Some(e.to_string());
                Err(ViewError::Invalid(e))
            }
        }
    }

    /// Teachers get a shortcut to the class task board.
    pub fn manage_tasks(&self) -> Option<Route> {
        self.is_teacher().then(|| Route::CreateTask {
            class_id: self.class_id.clone(),
        })
    }
}
