//! services/portal/src/views/classes.rs
//!
//! The class list (created by me / joined by me) and the create-class modal.

use std::sync::OnceLock;

use alumnos_core::classes::{split_classes, ClassSplit};
use alumnos_core::domain::{NewClass, Session, Student};
use alumnos_core::validation::{self, ValidationError};
use regex::Regex;
use tracing::{error, info};

use crate::views::{banner_text, AppState, Route, SessionContext, ViewError, ViewResult};

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

/// The create-class form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDraft {
    pub name: String,
    pub student_input: String,
    pub students: Vec<Student>,
}

impl ClassDraft {
    /// Adds `student_input` to the roster; display name is the address' local part.
    pub fn add_student(&mut self, my_email: &str) -> Result<(), ValidationError> {
        let email = self.student_input.trim();
        validation::require("email", email)?;
        if !email_pattern().is_match(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if email == my_email {
            return Err(ValidationError::SelfEnrollment);
        }
        if self.students.iter().any(|s| s.email == email) {
            return Err(ValidationError::DuplicateStudent);
        }
        self.students.push(Student::from_email(email));
        self.student_input.clear();
        Ok(())
    }

    pub fn remove_student(&mut self, email: &str) {
        self.students.retain(|s| s.email != email);
    }

    /// The create button is enabled iff the name is non-blank and the roster is not empty.
    pub fn can_create(&self) -> bool {
        !self.name.trim().is_empty() && !self.students.is_empty()
    }
}

pub struct ClassesView {
    state: AppState,
    session: Session,
    pub classes: ClassSplit,
    /// The open create-class modal, if any.
    pub draft: Option<ClassDraft>,
    pub error: Option<String>,
}

impl ClassesView {
    pub async fn mount(state: AppState, ctx: &SessionContext) -> ViewResult<Self> {
        let session = ctx.require_profile()?;
        let mut view = Self {
            state,
            session,
            classes: ClassSplit::default(),
            draft: None,
            error: None,
        };
        // A failed load leaves the lists empty and shows the banner.
        let _ = view.reload().await;
        Ok(view)
    }

    pub async fn reload(&mut self) -> ViewResult<()> {
        match self.state.classes.list_classes(&self.session.token).await {
            Ok(all) => {
                self.classes = split_classes(all, &self.session.user.email);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load classes: {}", e);
                self.error = Some(banner_text(&e, "could not load the classes"));
                Err(ViewError::Failed(e))
            }
        }
    }

    pub fn open_modal(&mut self) {
        self.draft = Some(ClassDraft::default());
        self.error = None;
    }

    pub fn close_modal(&mut self) {
        self.draft = None;
        self.error = None;
    }

    pub fn add_student(&mut self) -> ViewResult<()> {
        let me = self.session.user.email.clone();
        let draft = self.draft.get_or_insert_with(ClassDraft::default);
        match draft.add_student(&me) {
            Ok(()) => {
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn remove_student(&mut self, email: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.remove_student(email);
        }
    }

    /// Creates the class, reloads the lists and closes the modal.
    pub async fn create_class(&mut self) -> ViewResult<()> {
        let draft = self.draft.clone().unwrap_or_default();
        let checked = validation::require("class name", &draft.name).and_then(|_| {
            if draft.students.is_empty() {
                Err(ValidationError::NoStudents)
            } else {
                Ok(())
            }
        });
        if let Err(e) = checked {
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        let class = NewClass {
            class_name: draft.name.trim().to_string(),
            students: draft.students,
            creator_name: self.session.user.name.clone(),
            creator_email: self.session.user.email.clone(),
        };
        if let Err(e) = self.state.classes.create_class(&self.session.token, &class).await {
            error!("Failed to create class '{}': {}", class.class_name, e);
            self.error = Some(banner_text(&e, "could not create the class"));
            return Err(ViewError::Failed(e));
        }
        info!(class = %class.class_name, students = class.students.len(), "Class created");

        self.reload().await?;
        self.close_modal();
        Ok(())
    }

    /// Classes I created open the task board, the others the task list.
    pub fn open_class(&self, class_id: &str) -> Route {
        if self.classes.is_creator_of(class_id) {
            Route::CreateTask {
                class_id: class_id.to_string(),
            }
        } else {
            Route::ClassTasks {
                class_id: class_id.to_string(),
            }
        }
    }
}
