pub mod classes;
pub mod domain;
pub mod ports;
pub mod questionnaire;
pub mod tasks;
pub mod threads;
pub mod validation;

pub use domain::{
    Class, ContactThread, Message, Notification, Role, Session, Student, Task, TaskStatus,
    UserProfile,
};
pub use ports::{
    AuthService, ClassService, MessageService, NotificationService, PortError, PortResult,
    QuestionnaireService, SessionStore, TaskService,
};
pub use validation::ValidationError;
