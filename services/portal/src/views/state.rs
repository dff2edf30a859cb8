//! services/portal/src/views/state.rs
//!
//! Defines the shared state handed to every view.

use crate::adapters::HttpApi;
use crate::config::Config;
use alumnos_core::ports::{
    AuthService, ClassService, MessageService, NotificationService, QuestionnaireService,
    TaskService,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Views)
//=========================================================================================

/// The service ports and configuration, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<dyn AuthService>,
    pub classes: Arc<dyn ClassService>,
    pub tasks: Arc<dyn TaskService>,
    pub messages: Arc<dyn MessageService>,
    pub notifications: Arc<dyn NotificationService>,
    pub questionnaires: Arc<dyn QuestionnaireService>,
}

impl AppState {
    /// Wires every port to the same HTTP adapter.
    pub fn with_http(config: Arc<Config>, api: HttpApi) -> Self {
        let api = Arc::new(api);
        Self {
            config,
            auth: api.clone(),
            classes: api.clone(),
            tasks: api.clone(),
            messages: api.clone(),
            notifications: api.clone(),
            questionnaires: api,
        }
    }
}
