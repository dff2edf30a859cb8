//! services/portal/src/views/messages.rs
//!
//! The inbox: contacts folded from the flat message list, a searchable contact
//! list and one open chat refreshed in the background.

use alumnos_core::domain::{ContactThread, Message, OutgoingMessage, Session, UserProfile};
use alumnos_core::threads::{filter_contacts, group_into_threads};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::views::poller::ChatPoller;
use crate::views::scroll::ScrollTracker;
use crate::views::{AppState, SessionContext, ViewResult};

/// Author label for my own messages.
pub const ME: &str = "Tú";

/// One rendered chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub message_id: Option<String>,
    pub author: String,
    pub content: String,
    pub is_read: bool,
    /// Unread and sent by the other party.
    pub can_mark_read: bool,
}

pub struct MessagesView {
    state: AppState,
    session: Session,
    pub me: UserProfile,
    pub contacts: Vec<ContactThread>,
    pub search: String,
    /// The open chat. Messages are kept oldest first.
    pub active: Option<ContactThread>,
    pub draft: String,
    pub scroll: ScrollTracker,
    poller: Option<ChatPoller>,
}

impl MessagesView {
    pub async fn mount(state: AppState, ctx: &SessionContext) -> ViewResult<Self> {
        let session = ctx.require()?;
        let me = match state.auth.current_user(&session.token).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to refresh the profile, using the stored one: {}", e);
                session.user.clone()
            }
        };
        let mut view = Self {
            state,
            session,
            me,
            contacts: Vec::new(),
            search: String::new(),
            active: None,
            draft: String::new(),
            scroll: ScrollTracker::default(),
            poller: None,
        };
        view.load_contacts().await;
        Ok(view)
    }

    /// Rebuilds the contact list from every message. Failures keep the old list.
    pub async fn load_contacts(&mut self) {
        match self.state.messages.list_messages(&self.session.token).await {
            Ok(all) => self.contacts = group_into_threads(&all, &self.me.email),
            Err(e) => error!("Failed to load messages: {}", e),
        }
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Contacts matching the current search, recomputed on every call.
    pub fn visible_contacts(&self) -> Vec<&ContactThread> {
        filter_contacts(&self.contacts, &self.search)
    }

    /// Opens the chat with `email` and starts refreshing it. Any previous poll stops.
    pub fn open_chat(&mut self, email: &str) -> bool {
        let Some(contact) = self.contacts.iter().find(|c| c.email == email).cloned() else {
            return false;
        };
        self.poller = None;
        self.poller = Some(ChatPoller::start(
            self.state.messages.clone(),
            self.session.token.clone(),
            contact.email.clone(),
            self.state.config.poll_interval,
        ));
        self.active = Some(contact);
        self.scroll.reset();
        true
    }

    pub fn close_chat(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.active = None;
    }

    pub fn is_chat_open(&self) -> bool {
        self.active.is_some()
    }

    /// Waits for the next background refresh and applies it.
    ///
    /// Returns `None` when no chat is open, otherwise whether the pane should
    /// scroll to the bottom.
    pub async fn next_update(&mut self) -> Option<bool> {
        let poller = self.poller.as_mut()?;
        let contact = poller.contact_email().to_string();
        let messages = poller.next_update().await?;
        self.apply_update(&contact, messages)
    }

    /// Applies a refresh that is already waiting, if any.
    pub fn poll_pending(&mut self) -> Option<bool> {
        let poller = self.poller.as_mut()?;
        let contact = poller.contact_email().to_string();
        let messages = poller.try_update()?;
        self.apply_update(&contact, messages)
    }

    /// Replaces the open chat's messages wholesale. Updates for another contact are dropped.
    fn apply_update(&mut self, contact: &str, messages: Vec<Message>) -> Option<bool> {
        let active = self.active.as_mut().filter(|a| a.email == contact)?;
        active.messages = messages;
        Some(self.scroll.should_follow())
    }

    /// Sends the draft to the open chat and appends it locally. Failures are only logged.
    pub async fn send(&mut self) -> bool {
        let content = self.draft.trim().to_string();
        let Some(active) = self.active.as_ref() else {
            return false;
        };
        if content.is_empty() {
            return false;
        }
        let outgoing = OutgoingMessage {
            sender_email: Some(self.me.email.clone()),
            recipient_email: active.email.clone(),
            content,
        };
        if let Err(e) = self
            .state
            .messages
            .send_message(&self.session.token, &outgoing)
            .await
        {
            error!(to = %outgoing.recipient_email, "Failed to send message: {}", e);
            return false;
        }
        info!(to = %outgoing.recipient_email, "Message sent");

        let mut sent = Message::from(outgoing);
        sent.sender_name = self.me.name.clone();
        if let Some(active) = self.active.as_mut() {
            sent.recipient_name = active.name.clone();
            if let Some(contact) = self.contacts.iter_mut().find(|c| c.email == active.email) {
                contact.messages.push(sent.clone());
            }
            active.messages.push(sent);
        }
        self.draft.clear();
        true
    }

    /// Fire-and-forget mark-as-read. Nothing changes locally; the next refresh shows it.
    pub fn mark_as_read(&self, message_id: &str) -> JoinHandle<()> {
        let messages = self.state.messages.clone();
        let token = self.session.token.clone();
        let message_id = message_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = messages.mark_read(&token, &message_id).await {
                error!(message_id = %message_id, "Failed to mark message as read: {}", e);
            }
        })
    }

    /// Marks the rendered line at `index` as read, if that line offers it.
    pub fn mark_line_read(&self, index: usize) -> Option<JoinHandle<()>> {
        let line = self.chat_lines().into_iter().nth(index)?;
        if !line.can_mark_read {
            return None;
        }
        Some(self.mark_as_read(&line.message_id?))
    }

    /// The open chat, newest message first.
    pub fn chat_lines(&self) -> Vec<ChatLine> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        active
            .messages
            .iter()
            .rev()
            .map(|m| {
                let mine = m.sender_email == self.me.email;
                ChatLine {
                    message_id: m.id.clone(),
                    author: if mine { ME.to_string() } else { m.sender_name.clone() },
                    content: m.content.clone(),
                    is_read: m.is_read,
                    can_mark_read: !m.is_read && !mine,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fakes::{self, FakeApi};
    use alumnos_core::domain::Role;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    fn seeded() -> Arc<FakeApi> {
        let api = Arc::new(FakeApi::default());
        *api.profile.lock().unwrap() = Some(fakes::profile("me@x.com", Role::Student));
        *api.messages.lock().unwrap() = vec![
            fakes::message("m1", "me@x.com", "ana@x.com", "hola"),
            fakes::message("m2", "luis@x.com", "me@x.com", "hey"),
            fakes::message("m3", "ana@x.com", "me@x.com", "qué tal"),
        ];
        api
    }

    async fn mounted(api: &Arc<FakeApi>) -> MessagesView {
        let ctx = fakes::signed_in(fakes::session("me@x.com", Role::Student));
        MessagesView::mount(fakes::app(api), &ctx).await.unwrap()
    }

    #[tokio::test]
    async fn contacts_are_grouped_and_searchable() {
        let api = seeded();
        let mut view = mounted(&api).await;

        let emails: Vec<_> = view.contacts.iter().map(|c| c.email.as_str()).collect();
        assert_eq!(emails, ["ana@x.com", "luis@x.com"]);
        assert_eq!(view.contacts[0].messages.len(), 2);

        view.set_search("LUIS");
        let found: Vec<_> = view.visible_contacts().iter().map(|c| c.email.clone()).collect();
        assert_eq!(found, ["luis@x.com"]);
        view.set_search("");
        assert_eq!(view.visible_contacts().len(), 2);
    }

    #[tokio::test]
    async fn stored_profile_is_the_fallback() {
        let api = seeded();
        *api.profile.lock().unwrap() = None;
        let view = mounted(&api).await;
        assert_eq!(view.me.email, "me@x.com");
        assert_eq!(view.contacts.len(), 2);
    }

    #[tokio::test]
    async fn send_needs_draft_and_open_chat() {
        let api = seeded();
        let mut view = mounted(&api).await;

        view.draft = "hi".into();
        assert!(!view.send().await);
        view.open_chat("ana@x.com");
        view.draft = "   ".into();
        assert!(!view.send().await);
        assert!(api.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn send_appends_optimistically() {
        let api = seeded();
        let mut view = mounted(&api).await;
        view.open_chat("ana@x.com");
        view.draft = "¿vienes?".into();

        assert!(view.send().await);
        assert!(view.draft.is_empty());
        assert_eq!(view.active.as_ref().unwrap().messages.len(), 3);
        assert_eq!(view.contacts[0].messages.len(), 3);
        let lines = view.chat_lines();
        assert_eq!(lines[0].author, ME);
        assert_eq!(lines[0].content, "¿vienes?");
        assert!(!lines[0].can_mark_read);
        assert_eq!(api.sent.lock().unwrap()[0].sender_email.as_deref(), Some("me@x.com"));
    }

    #[tokio::test]
    async fn failed_send_keeps_the_draft() {
        let api = seeded();
        let mut view = mounted(&api).await;
        view.open_chat("ana@x.com");
        api.fail(true);
        view.draft = "hola".into();

        assert!(!view.send().await);
        assert_eq!(view.draft, "hola");
        assert_eq!(view.active.as_ref().unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn mark_read_is_offered_for_incoming_unread_only() {
        let api = seeded();
        let mut view = mounted(&api).await;
        view.open_chat("ana@x.com");

        let lines = view.chat_lines();
        assert_eq!(lines[0].message_id.as_deref(), Some("m3"));
        assert!(lines[0].can_mark_read);
        assert!(!lines[1].can_mark_read);

        view.mark_as_read("m3").await.unwrap();
        assert_eq!(*api.marked.lock().unwrap(), vec!["m3".to_string()]);
        // No local change until the next refresh.
        assert!(!view.active.as_ref().unwrap().messages[1].is_read);
    }

    #[tokio::test]
    async fn mark_line_read_picks_the_rendered_line() {
        let api = seeded();
        let mut view = mounted(&api).await;
        assert!(view.mark_line_read(0).is_none());
        view.open_chat("ana@x.com");

        // Own message and out-of-range lines are not offered.
        assert!(view.mark_line_read(1).is_none());
        assert!(view.mark_line_read(7).is_none());
        assert!(api.marked.lock().unwrap().is_empty());

        view.mark_line_read(0).unwrap().await.unwrap();
        assert_eq!(*api.marked.lock().unwrap(), vec!["m3".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_replaces_the_open_chat() {
        let api = seeded();
        let mut view = mounted(&api).await;
        view.open_chat("ana@x.com");
        let mut read = fakes::message("m3", "ana@x.com", "me@x.com", "qué tal");
        read.is_read = true;
        api.messages.lock().unwrap()[2] = read;
        view.scroll.on_scroll(500, 100, 400);

        assert_eq!(view.next_update().await, Some(true));
        let active = view.active.as_ref().unwrap();
        assert_eq!(active.messages.len(), 2);
        assert!(active.messages[1].is_read);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_stops_polling() {
        let api = seeded();
        let mut view = mounted(&api).await;
        let after_mount = api.list_message_calls.load(Ordering::SeqCst);

        view.open_chat("ana@x.com");
        view.close_chat();
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(api.list_message_calls.load(Ordering::SeqCst), after_mount);
        assert_eq!(view.next_update().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_chats_drops_the_old_poll() {
        let api = seeded();
        let mut view = mounted(&api).await;
        view.open_chat("ana@x.com");
        tokio::time::sleep(Duration::from_secs(3)).await;
        view.open_chat("luis@x.com");

        assert_eq!(view.next_update().await, Some(false));
        let active = view.active.as_ref().unwrap();
        assert_eq!(active.email, "luis@x.com");
        assert_eq!(active.messages.len(), 1);
        assert_eq!(active.messages[0].id.as_deref(), Some("m2"));
    }
}
