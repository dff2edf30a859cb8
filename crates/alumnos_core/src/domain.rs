//! crates/alumnos_core/src/domain.rs
//!
//! Defines the core data structures exchanged with the school platform API.
//! Field names follow the backend's camelCase JSON; Mongo style `_id` keys are
//! accepted wherever an id is expected.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::questionnaire::{PresentedQuestion, Question};

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// The role a user holds on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Teacher => write!(f, "teacher"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// The profile returned by the login endpoint and stored next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl UserProfile {
    pub fn is_teacher(&self) -> bool {
        self.role == Some(Role::Teacher)
    }
}

/// An authenticated session: an opaque token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub code: String,
    pub new_password: String,
}

/// A short acknowledgement some endpoints answer with.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerNotice {
    #[serde(default)]
    pub message: Option<String>,
}

//=========================================================================================
// Messaging
//=========================================================================================

/// A single direct message. Only `is_read` changes once the message is sent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: String,
    pub recipient_email: String,
    #[serde(default)]
    pub recipient_name: String,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

/// The payload for sending a message. The compose page leaves the sender to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_email: Option<String>,
    pub recipient_email: String,
    pub content: String,
}

impl From<OutgoingMessage> for Message {
    fn from(outgoing: OutgoingMessage) -> Self {
        Message {
            sender_email: outgoing.sender_email.unwrap_or_default(),
            recipient_email: outgoing.recipient_email,
            content: outgoing.content,
            ..Default::default()
        }
    }
}

/// A conversation with one counterpart, derived on the client from the flat message list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactThread {
    pub email: String,
    pub name: String,
    pub messages: Vec<Message>,
}

//=========================================================================================
// Notifications
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

//=========================================================================================
// Classes
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub email: String,
}

impl Student {
    /// Builds a roster entry from an e-mail, naming the student after its local part.
    pub fn from_email(email: &str) -> Self {
        let name = email.split('@').next().unwrap_or(email).to_string();
        Student {
            name,
            email: email.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(alias = "className")]
    pub name: String,
    #[serde(default)]
    pub creator_email: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub class_name: String,
    pub students: Vec<Student>,
    pub creator_name: String,
    pub creator_email: String,
}

//=========================================================================================
// Tasks
//=========================================================================================

/// Lifecycle of a task assigned to one student.
///
/// The backend sends Spanish labels; anything unrecognised is treated as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    Submitted,
    Late,
    Graded,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pendiente",
            TaskStatus::Submitted => "entregado",
            TaskStatus::Late => "fuera de plazo",
            TaskStatus::Graded => "calificado",
        }
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "entregado" => TaskStatus::Submitted,
            "fuera de plazo" => TaskStatus::Late,
            "calificado" => TaskStatus::Graded,
            _ => TaskStatus::Pending,
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInfo {
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub class_id: String,
    pub instructions: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub student_email: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub submission: Option<SubmissionInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub class_id: String,
    pub instructions: String,
    pub due_date: DateTime<Utc>,
}

/// Response of the create-task endpoint: one task per enrolled student.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedTasks {
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRequest {
    pub task_id: String,
    pub grade: u8,
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// A submission downloaded by a teacher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

//=========================================================================================
// Questionnaires
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub title: String,
    pub instructions: String,
    pub due_date: NaiveDate,
    pub questions: Vec<Question>,
    pub questions_to_show: u32,
    #[serde(default)]
    pub teacher_id: Option<String>,
    #[serde(default)]
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSheet {
    pub student_id: String,
    pub answers: Vec<Answer>,
}

/// A student who has answered a questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub email: String,
}

/// Questions served to a student for one attempt.
pub type QuestionSet = Vec<PresentedQuestion>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_status_is_pending() {
        let status: TaskStatus = serde_json::from_str("\"archivado\"").unwrap();
        assert_eq!(status, TaskStatus::Pending);
        let late: TaskStatus = serde_json::from_str("\"Fuera de plazo\"").unwrap();
        assert_eq!(late, TaskStatus::Late);
        assert_eq!(serde_json::to_string(&TaskStatus::Graded).unwrap(), "\"calificado\"");
    }

    #[test]
    fn message_accepts_mongo_ids() {
        let json = r#"{
            "_id": "m1",
            "senderEmail": "a@x.com",
            "senderName": "Ana",
            "recipientEmail": "b@x.com",
            "recipientName": "Beto",
            "content": "hola",
            "isRead": false,
            "status": "sent",
            "sentAt": "2024-03-01T10:00:00Z"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id.as_deref(), Some("m1"));
        assert_eq!(message.sender_name, "Ana");
        assert!(!message.is_read);
    }

    #[test]
    fn compose_payload_omits_missing_sender() {
        let outgoing = OutgoingMessage {
            sender_email: None,
            recipient_email: "b@x.com".into(),
            content: "hi".into(),
        };
        let value = serde_json::to_value(&outgoing).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "recipientEmail": "b@x.com", "content": "hi" })
        );
    }

    #[test]
    fn login_profile_without_id_or_name() {
        let session: Session = serde_json::from_str(
            r#"{"token":"T","user":{"email":"a@b.com","role":"student"}}"#,
        )
        .unwrap();
        assert_eq!(session.token, "T");
        assert_eq!(session.user.role, Some(Role::Student));
        assert!(session.user.name.is_empty());
    }

    #[test]
    fn student_named_after_local_part() {
        let student = Student::from_email("maria.lopez@school.edu");
        assert_eq!(student.name, "maria.lopez");
    }
}
