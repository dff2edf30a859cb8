//! crates/alumnos_core/src/threads.rs
//!
//! Folds the flat message list into one thread per conversation counterpart.

use std::collections::HashMap;

use crate::domain::{ContactThread, Message};

/// Returns the other party of a message as `(email, name)`, seen from `me`.
pub fn counterpart<'a>(message: &'a Message, me: &str) -> (&'a str, &'a str) {
    if message.sender_email == me {
        (&message.recipient_email, &message.recipient_name)
    } else {
        (&message.sender_email, &message.sender_name)
    }
}

/// Groups messages by counterpart e-mail.
///
/// Threads appear in the order their first message appears, messages keep the
/// order of the input list, and the first name seen for a counterpart wins.
pub fn group_into_threads(messages: &[Message], me: &str) -> Vec<ContactThread> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut threads: Vec<ContactThread> = Vec::new();

    for message in messages {
        let (email, name) = counterpart(message, me);
        let slot = *index.entry(email).or_insert_with(|| {
            threads.push(ContactThread {
                email: email.to_string(),
                name: name.to_string(),
                messages: Vec::new(),
            });
            threads.len() - 1
        });
        threads[slot].messages.push(message.clone());
    }

    threads
}

/// Case-insensitive substring search on contact name or e-mail. An empty query keeps everything.
pub fn filter_contacts<'a>(threads: &'a [ContactThread], query: &str) -> Vec<&'a ContactThread> {
    let needle = query.to_lowercase();
    threads
        .iter()
        .filter(|t| t.name.to_lowercase().contains(&needle) || t.email.to_lowercase().contains(&needle))
        .collect()
}

/// All messages exchanged with `email`, in list order.
pub fn conversation_with(messages: &[Message], email: &str) -> Vec<Message> {
    messages
        .iter()
        .filter(|m| m.sender_email == email || m.recipient_email == email)
        .cloned()
        .collect()
}
