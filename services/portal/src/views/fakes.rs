//! In-memory port implementations for view tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alumnos_core::domain::{
    AnswerSheet, Class, Credentials, DownloadedFile, GradeRequest, Message, NewClass, NewTask,
    Notification, OutgoingMessage, PasswordReset, QuestionSet, Questionnaire, Registration,
    Respondent, Role, ServerNotice, Session, SubmissionInfo, Task, TaskStatus, UploadFile,
    UserProfile,
};
use alumnos_core::ports::*;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};

use crate::adapters::MemorySessionStore;
use crate::config::Config;
use crate::views::{AppState, SessionContext};

#[derive(Default)]
pub struct FakeApi {
    pub failing: AtomicBool,
    pub profile: Mutex<Option<UserProfile>>,
    pub classes: Mutex<Vec<Class>>,
    pub created_classes: Mutex<Vec<NewClass>>,
    pub tasks: Mutex<Vec<Task>>,
    pub new_tasks: Mutex<Vec<NewTask>>,
    pub uploads: Mutex<Vec<(String, UploadFile)>>,
    pub grades: Mutex<Vec<GradeRequest>>,
    pub messages: Mutex<Vec<Message>>,
    pub sent: Mutex<Vec<OutgoingMessage>>,
    pub marked: Mutex<Vec<String>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub questionnaires: Mutex<Vec<Questionnaire>>,
    pub questions: Mutex<QuestionSet>,
    pub answer_sheets: Mutex<Vec<AnswerSheet>>,
    pub respondents: Mutex<Vec<Respondent>>,
    pub registrations: AtomicUsize,
    pub list_message_calls: AtomicUsize,
}

impl FakeApi {
    pub fn fail(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    fn check(&self) -> PortResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(PortError::Rejected("server says no".into()))
        } else {
            Ok(())
        }
    }
}

pub fn profile(email: &str, role: Role) -> UserProfile {
    UserProfile {
        id: format!("id-{}", email),
        email: email.into(),
        name: email.split('@').next().unwrap_or_default().into(),
        role: Some(role),
    }
}

pub fn session(email: &str, role: Role) -> Session {
    Session {
        token: "T".into(),
        user: profile(email, role),
    }
}

pub fn task(id: &str, student: &str) -> Task {
    Task {
        id: id.into(),
        class_id: "c1".into(),
        instructions: "Read chapter 1".into(),
        due_date: Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap(),
        student_email: student.into(),
        status: TaskStatus::Pending,
        grade: None,
        submission: None,
    }
}

pub fn message(id: &str, from: &str, to: &str, content: &str) -> Message {
    Message {
        id: Some(id.into()),
        sender_email: from.into(),
        sender_name: from.split('@').next().unwrap_or_default().into(),
        recipient_email: to.into(),
        recipient_name: to.split('@').next().unwrap_or_default().into(),
        content: content.into(),
        ..Default::default()
    }
}

pub fn app(api: &Arc<FakeApi>) -> AppState {
    AppState {
        config: Arc::new(Config::default()),
        auth: api.clone(),
        classes: api.clone(),
        tasks: api.clone(),
        messages: api.clone(),
        notifications: api.clone(),
        questionnaires: api.clone(),
    }
}

pub fn signed_in(session: Session) -> SessionContext {
    SessionContext::new(Arc::new(MemorySessionStore::with_session(session)))
}

pub fn signed_out() -> SessionContext {
    SessionContext::new(Arc::new(MemorySessionStore::default()))
}

#[async_trait]
impl AuthService for FakeApi {
    async fn login(&self, credentials: &Credentials) -> PortResult<Session> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::Unauthorized);
        }
        Ok(Session {
            token: "T".into(),
            user: profile(&credentials.email, Role::Student),
        })
    }

    async fn register(&self, _registration: &Registration) -> PortResult<ServerNotice> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(ServerNotice {
            message: Some("user registered".into()),
        })
    }

    async fn current_user(&self, _token: &str) -> PortResult<UserProfile> {
        self.check()?;
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or(PortError::Unauthorized)
    }

    async fn send_reset_code(&self, _email: &str) -> PortResult<ServerNotice> {
        self.check()?;
        Ok(ServerNotice::default())
    }

    async fn reset_password(&self, _reset: &PasswordReset) -> PortResult<ServerNotice> {
        self.check()?;
        Ok(ServerNotice {
            message: Some("password changed".into()),
        })
    }
}

#[async_trait]
impl ClassService for FakeApi {
    async fn list_classes(&self, _token: &str) -> PortResult<Vec<Class>> {
        self.check()?;
        Ok(self.classes.lock().unwrap().clone())
    }

    async fn get_class(&self, _token: &str, class_id: &str) -> PortResult<Class> {
        self.check()?;
        self.classes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == class_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(class_id.into()))
    }

    async fn create_class(&self, _token: &str, class: &NewClass) -> PortResult<()> {
        self.check()?;
        self.created_classes.lock().unwrap().push(class.clone());
        let mut classes = self.classes.lock().unwrap();
        let id = format!("c{}", classes.len() + 1);
        classes.push(Class {
            id,
            name: class.class_name.clone(),
            creator_email: class.creator_email.clone(),
            creator_name: class.creator_name.clone(),
            students: class.students.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl TaskService for FakeApi {
    async fn list_tasks(&self, _token: &str, class_id: &str) -> PortResult<Vec<Task>> {
        self.check()?;
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.class_id == class_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, _token: &str, new: &NewTask) -> PortResult<Option<Vec<Task>>> {
        self.check()?;
        self.new_tasks.lock().unwrap().push(new.clone());
        let mut created = task("t-new", "s@x.com");
        created.class_id = new.class_id.clone();
        created.instructions = new.instructions.clone();
        created.due_date = new.due_date;
        Ok(Some(vec![created]))
    }

    async fn get_task(&self, _token: &str, task_id: &str) -> PortResult<Task> {
        self.check()?;
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(task_id.into()))
    }

    async fn submit_task(&self, _token: &str, task_id: &str, file: &UploadFile) -> PortResult<()> {
        self.check()?;
        self.uploads
            .lock()
            .unwrap()
            .push((task_id.to_string(), file.clone()));
        for t in self.tasks.lock().unwrap().iter_mut().filter(|t| t.id == task_id) {
            t.status = TaskStatus::Submitted;
            t.submission = Some(SubmissionInfo {
                file_url: Some(format!("https://files.example/{}", file.file_name)),
                submitted_at: None,
            });
        }
        Ok(())
    }

    async fn download_submission(&self, _token: &str, task_id: &str) -> PortResult<DownloadedFile> {
        self.check()?;
        Ok(DownloadedFile {
            file_name: format!("{}.pdf", task_id),
            bytes: Bytes::from_static(b"%PDF"),
        })
    }

    async fn grade_task(&self, _token: &str, grade: &GradeRequest) -> PortResult<()> {
        self.check()?;
        self.grades.lock().unwrap().push(grade.clone());
        for t in self.tasks.lock().unwrap().iter_mut().filter(|t| t.id == grade.task_id) {
            t.grade = Some(grade.grade);
            t.status = TaskStatus::Graded;
        }
        Ok(())
    }
}

#[async_trait]
impl MessageService for FakeApi {
    async fn list_messages(&self, _token: &str) -> PortResult<Vec<Message>> {
        self.list_message_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn send_message(&self, _token: &str, message: &OutgoingMessage) -> PortResult<()> {
        self.check()?;
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn mark_read(&self, _token: &str, message_id: &str) -> PortResult<()> {
        self.check()?;
        self.marked.lock().unwrap().push(message_id.to_string());
        Ok(())
    }
}

#[async_trait]
impl NotificationService for FakeApi {
    async fn list_notifications(&self, _token: &str) -> PortResult<Vec<Notification>> {
        self.check()?;
        Ok(self.notifications.lock().unwrap().clone())
    }
}

#[async_trait]
impl QuestionnaireService for FakeApi {
    async fn create_questionnaire(
        &self,
        _token: &str,
        questionnaire: &Questionnaire,
    ) -> PortResult<bool> {
        self.check()?;
        self.questionnaires.lock().unwrap().push(questionnaire.clone());
        Ok(true)
    }

    async fn random_questions(
        &self,
        _token: &str,
        _questionnaire_id: &str,
        _student_id: &str,
    ) -> PortResult<QuestionSet> {
        self.check()?;
        Ok(self.questions.lock().unwrap().clone())
    }

    async fn submit_answers(
        &self,
        _token: &str,
        _questionnaire_id: &str,
        answers: &AnswerSheet,
    ) -> PortResult<()> {
        self.check()?;
        self.answer_sheets.lock().unwrap().push(answers.clone());
        Ok(())
    }

    async fn responses(&self, _token: &str, _questionnaire_id: &str) -> PortResult<Vec<Respondent>> {
        self.check()?;
        Ok(self.respondents.lock().unwrap().clone())
    }
}
