//! services/portal/src/views/router.rs
//!
//! Maps URL paths to views and derives the breadcrumb trail shown above every page.

use std::fmt;

/// Every client-side route. Unknown paths land on `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    ServerError,
    Login,
    Information,
    Registration,
    Calendar,
    Dashboard,
    Messages,
    Notifications,
    Chat,
    Classes,
    CreateTask { class_id: String },
    ClassTasks { class_id: String },
    TaskDetail { task_id: String },
    CreateQuestionnaire,
    PasswordRecovery,
    NotFound(String),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["500"] => Route::ServerError,
            ["login"] => Route::Login,
            ["informacion"] => Route::Information,
            ["registro"] => Route::Registration,
            ["calendario"] => Route::Calendar,
            ["dashboard"] => Route::Dashboard,
            ["mensajes"] => Route::Messages,
            ["notificaciones"] => Route::Notifications,
            ["chat"] => Route::Chat,
            ["clases"] => Route::Classes,
            ["clases", class_id, "tareas", "crear"] => Route::CreateTask {
                class_id: class_id.to_string(),
            },
            ["clases", class_id, "tareas"] => Route::ClassTasks {
                class_id: class_id.to_string(),
            },
            ["tareas", task_id] => Route::TaskDetail {
                task_id: task_id.to_string(),
            },
            ["crear-cuestionario"] => Route::CreateQuestionnaire,
            ["recuperarpassword"] => Route::PasswordRecovery,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::ServerError => "/500".to_string(),
            Route::Login => "/login".to_string(),
            Route::Information => "/informacion".to_string(),
            Route::Registration => "/registro".to_string(),
            Route::Calendar => "/calendario".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Messages => "/mensajes".to_string(),
            Route::Notifications => "/notificaciones".to_string(),
            Route::Chat => "/chat".to_string(),
            Route::Classes => "/clases".to_string(),
            Route::CreateTask { class_id } => format!("/clases/{}/tareas/crear", class_id),
            Route::ClassTasks { class_id } => format!("/clases/{}/tareas", class_id),
            Route::TaskDetail { task_id } => format!("/tareas/{}", task_id),
            Route::CreateQuestionnaire => "/crear-cuestionario".to_string(),
            Route::PasswordRecovery => "/recuperarpassword".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Routes whose view redirects to login when no session is stored.
    pub fn requires_session(&self) -> bool {
        matches!(
            self,
            Route::Calendar
                | Route::Dashboard
                | Route::Messages
                | Route::Notifications
                | Route::Chat
                | Route::Classes
                | Route::CreateTask { .. }
                | Route::ClassTasks { .. }
                | Route::TaskDetail { .. }
                | Route::CreateQuestionnaire
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

//=========================================================================================
// Breadcrumbs
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub href: String,
}

/// "Inicio" for the root, then one crumb per path segment linking to the cumulative path.
pub fn breadcrumbs(path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: "Inicio".to_string(),
        href: "/".to_string(),
    }];

    let mut href = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        href.push('/');
        href.push_str(segment);
        crumbs.push(Crumb {
            label: capitalize(segment),
            href: href.clone(),
        });
    }
    crumbs
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders the trail as `Inicio / Clases / Abc`.
pub fn render_breadcrumbs(path: &str) -> String {
    breadcrumbs(path)
        .into_iter()
        .map(|c| c.label)
        .collect::<Vec<_>>()
        .join(" / ")
}
