//! services/portal/src/views/poller.rs
//!
//! The background refresh of an open chat.
//!
//! While a chat is open, a spawned task re-fetches the full message list once
//! per interval and sends the conversation with the open contact over a
//! channel. The first fetch happens one interval after the chat opens.

use std::sync::Arc;
use std::time::Duration;

use alumnos_core::domain::Message;
use alumnos_core::ports::MessageService;
use alumnos_core::threads::conversation_with;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A running poll for one contact. Dropping it stops the poll.
pub struct ChatPoller {
    contact_email: String,
    cancellation_token: CancellationToken,
    handle: JoinHandle<()>,
    updates: mpsc::Receiver<Vec<Message>>,
}

impl ChatPoller {
    pub fn start(
        messages: Arc<dyn MessageService>,
        auth_token: String,
        contact_email: String,
        period: Duration,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let (tx, updates) = mpsc::channel(1);
        let handle = tokio::spawn(poll_loop(
            messages,
            auth_token,
            contact_email.clone(),
            period,
            tx,
            cancellation_token.clone(),
        ));
        debug!(contact = %contact_email, ?period, "Chat poller started");
        Self {
            contact_email,
            cancellation_token,
            handle,
            updates,
        }
    }

    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    pub fn is_running(&self) -> bool {
        !self.cancellation_token.is_cancelled() && !self.handle.is_finished()
    }

    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }

    /// Waits for the next refreshed conversation. `None` once the poller is stopped.
    pub async fn next_update(&mut self) -> Option<Vec<Message>> {
        if self.cancellation_token.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => None,
            update = self.updates.recv() => update,
        }
    }

    /// A refreshed conversation if one is already waiting.
    pub fn try_update(&mut self) -> Option<Vec<Message>> {
        if self.cancellation_token.is_cancelled() {
            return None;
        }
        self.updates.try_recv().ok()
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
        self.handle.abort();
        debug!(contact = %self.contact_email, "Chat poller stopped");
    }
}

async fn poll_loop(
    messages: Arc<dyn MessageService>,
    auth_token: String,
    contact_email: String,
    period: Duration,
    tx: mpsc::Sender<Vec<Message>>,
    cancellation_token: CancellationToken,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let fetched = tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            fetched = messages.list_messages(&auth_token) => fetched,
        };
        let conversation = match fetched {
            Ok(all) => conversation_with(&all, &contact_email),
            Err(e) => {
                warn!(contact = %contact_email, "Failed to refresh messages: {}", e);
                continue;
            }
        };

        tokio::select! {
            biased;
            _ = cancellation_token.cancelled() => break,
            sent = tx.send(conversation) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
}
