//! services/portal/src/views/notifications.rs

use alumnos_core::domain::Notification;
use tracing::error;

use crate::views::{AppState, SessionContext, ViewResult};

pub struct NotificationsView {
    pub notifications: Vec<Notification>,
    pub search: String,
}

impl NotificationsView {
    /// Loads the user's notifications. A failed load shows an empty list.
    pub async fn mount(state: AppState, ctx: &SessionContext) -> ViewResult<Self> {
        let session = ctx.require()?;
        let notifications = state
            .notifications
            .list_notifications(&session.token)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to load notifications: {}", e);
                Vec::new()
            });
        Ok(Self {
            notifications,
            search: String::new(),
        })
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Case-insensitive substring match on title or message.
    pub fn visible(&self) -> Vec<&Notification> {
        let needle = self.search.to_lowercase();
        let matches = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        };
        self.notifications
            .iter()
            .filter(|n| needle.is_empty() || matches(&n.title) || matches(&n.message))
            .collect()
    }
}
