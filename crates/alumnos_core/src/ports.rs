//! crates/alumnos_core/src/ports.rs
//!
//! Defines the service contracts (traits) the views depend on.
//! These traits form the boundary of the hexagonal architecture: the views only
//! know these ports, while the concrete HTTP client and session storage live in
//! the application crate.

use async_trait::async_trait;

use crate::domain::{
    AnswerSheet, Class, Credentials, DownloadedFile, GradeRequest, Message, NewClass, NewTask,
    Notification, OutgoingMessage, PasswordReset, QuestionSet, Questionnaire, Registration,
    Respondent, ServerNotice, Session, Task, UploadFile, UserProfile,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g. network, storage).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    /// The server refused the request and explained why.
    #[error("{0}")]
    Rejected(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Session Storage
//=========================================================================================

/// Persistent client-local storage for the token and profile.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> PortResult<Option<Session>>;
    fn save(&self, session: &Session) -> PortResult<()>;
    fn clear(&self) -> PortResult<()>;
}

//=========================================================================================
// Remote Service Ports (Traits)
//=========================================================================================
// Every authenticated call takes the opaque session token explicitly.
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> PortResult<Session>;

    async fn register(&self, registration: &Registration) -> PortResult<ServerNotice>;

    /// Profile of the token's owner.
    async fn current_user(&self, token: &str) -> PortResult<UserProfile>;

    /// Starts password recovery by mailing a code to `email`.
    async fn send_reset_code(&self, email: &str) -> PortResult<ServerNotice>;

    async fn reset_password(&self, reset: &PasswordReset) -> PortResult<ServerNotice>;
}

#[async_trait]
pub trait ClassService: Send + Sync {
    async fn list_classes(&self, token: &str) -> PortResult<Vec<Class>>;

    async fn get_class(&self, token: &str, class_id: &str) -> PortResult<Class>;

    async fn create_class(&self, token: &str, class: &NewClass) -> PortResult<()>;
}

#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self, token: &str, class_id: &str) -> PortResult<Vec<Task>>;

    /// Creates the task for every student of the class and returns the created tasks.
    async fn create_task(&self, token: &str, task: &NewTask) -> PortResult<Option<Vec<Task>>>;

    async fn get_task(&self, token: &str, task_id: &str) -> PortResult<Task>;

    async fn submit_task(&self, token: &str, task_id: &str, file: &UploadFile) -> PortResult<()>;

    async fn download_submission(&self, token: &str, task_id: &str) -> PortResult<DownloadedFile>;

    async fn grade_task(&self, token: &str, grade: &GradeRequest) -> PortResult<()>;
}

#[async_trait]
pub trait MessageService: Send + Sync {
    /// Every message the token's owner sent or received.
    async fn list_messages(&self, token: &str) -> PortResult<Vec<Message>>;

    async fn send_message(&self, token: &str, message: &OutgoingMessage) -> PortResult<()>;

    async fn mark_read(&self, token: &str, message_id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn list_notifications(&self, token: &str) -> PortResult<Vec<Notification>>;
}

#[async_trait]
pub trait QuestionnaireService: Send + Sync {
    /// Stores a questionnaire; `true` when the server confirmed success.
    async fn create_questionnaire(&self, token: &str, questionnaire: &Questionnaire)
        -> PortResult<bool>;

    async fn random_questions(
        &self,
        token: &str,
        questionnaire_id: &str,
        student_id: &str,
    ) -> PortResult<QuestionSet>;

    async fn submit_answers(
        &self,
        token: &str,
        questionnaire_id: &str,
        answers: &AnswerSheet,
    ) -> PortResult<()>;

    async fn responses(&self, token: &str, questionnaire_id: &str) -> PortResult<Vec<Respondent>>;
}
