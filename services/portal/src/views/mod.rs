//! services/portal/src/views/mod.rs
//!
//! One module per route. A view is the state behind a page: it reads the
//! session, calls the service ports and keeps what a front end renders.

pub mod chat;
#[cfg(test)]
pub(crate) mod fakes;
pub mod classes;
pub mod guard;
pub mod login;
pub mod messages;
pub mod notifications;
pub mod pages;
pub mod password;
pub mod poller;
pub mod questionnaires;
pub mod registration;
pub mod router;
pub mod scroll;
pub mod state;
pub mod submission;
pub mod task_board;
pub mod task_list;

use alumnos_core::ports::PortError;
use alumnos_core::validation::ValidationError;

pub use guard::SessionContext;
pub use router::Route;
pub use state::AppState;

/// Why a view action did not complete.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// No usable session: the front end must navigate to the given route.
    #[error("redirecting to {0}")]
    Redirect(Route),
    /// A client-side rule failed; no request was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The request failed or the server refused it.
    #[error(transparent)]
    Failed(#[from] PortError),
}

pub type ViewResult<T> = Result<T, ViewError>;

/// Text for an inline banner: the server's own message when it sent one, else `fallback`.
pub(crate) fn banner_text(error: &PortError, fallback: &str) -> String {
    match error {
        PortError::Rejected(message) => message.clone(),
        _ => fallback.to_string(),
    }
}
