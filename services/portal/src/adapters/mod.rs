pub mod auth;
pub mod classes;
pub mod http;
pub mod messages;
pub mod notifications;
pub mod questionnaires;
pub mod session_store;
pub mod tasks;

pub use http::HttpApi;
pub use session_store::{FileSessionStore, MemorySessionStore};
